//! Content service for discussions, answers and comments.

use olion_common::{AppError, AppResult, IdGenerator};
use olion_db::{
    entities::{answer, comment, discussion},
    repositories::ContentRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for starting a discussion.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDiscussionInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 20000))]
    pub content: String,
}

/// Input for an answer or a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
}

/// Content service for business logic.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ContentRepository,
    id_gen: IdGenerator,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub const fn new(content_repo: ContentRepository) -> Self {
        Self {
            content_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Start a discussion.
    pub async fn create_discussion(
        &self,
        user_id: &str,
        input: CreateDiscussionInput,
    ) -> AppResult<discussion::Model> {
        input.validate()?;

        let model = discussion::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(Some(user_id.to_string())),
            title: Set(input.title.trim().to_string()),
            content: Set(input.content),
            vote_score: Set(0),
            answers_count: Set(0),
            is_deleted: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.content_repo.create_discussion(model).await
    }

    /// Answer a visible discussion.
    pub async fn create_answer(
        &self,
        user_id: &str,
        discussion_id: &str,
        input: CreatePostInput,
    ) -> AppResult<answer::Model> {
        input.validate()?;
        self.get_discussion(discussion_id).await?;

        let model = answer::ActiveModel {
            id: Set(self.id_gen.generate()),
            discussion_id: Set(discussion_id.to_string()),
            user_id: Set(Some(user_id.to_string())),
            content: Set(input.content),
            vote_score: Set(0),
            is_deleted: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let answer = self.content_repo.create_answer(model).await?;
        self.content_repo
            .increment_answers_count(discussion_id)
            .await?;

        Ok(answer)
    }

    /// Comment on a visible answer.
    pub async fn create_comment(
        &self,
        user_id: &str,
        answer_id: &str,
        input: CreatePostInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;
        self.get_answer(answer_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            answer_id: Set(answer_id.to_string()),
            user_id: Set(Some(user_id.to_string())),
            content: Set(input.content),
            vote_score: Set(0),
            is_deleted: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.content_repo.create_comment(model).await
    }

    /// Get a discussion. Moderated discussions are reported as missing.
    pub async fn get_discussion(&self, id: &str) -> AppResult<discussion::Model> {
        self.content_repo
            .find_discussion(id)
            .await?
            .filter(|d| !d.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Discussion {id} not found")))
    }

    /// Get an answer. Moderated answers are reported as missing.
    pub async fn get_answer(&self, id: &str) -> AppResult<answer::Model> {
        self.content_repo
            .find_answer(id)
            .await?
            .filter(|a| !a.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Answer {id} not found")))
    }

    /// Newest discussions.
    pub async fn list_discussions(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<discussion::Model>> {
        self.content_repo.list_discussions(limit, until_id).await
    }

    /// Answers of a discussion.
    pub async fn list_answers(
        &self,
        discussion_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<answer::Model>> {
        self.get_discussion(discussion_id).await?;
        self.content_repo
            .list_answers(discussion_id, limit, offset)
            .await
    }

    /// Comments on an answer.
    pub async fn list_comments(
        &self,
        answer_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        self.get_answer(answer_id).await?;
        self.content_repo.list_comments(answer_id, limit, offset).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_discussion(is_deleted: bool) -> discussion::Model {
        discussion::Model {
            id: "d1".to_string(),
            user_id: Some("user1".to_string()),
            title: "Kenapa laptop saya panas?".to_string(),
            content: "Sudah dibersihkan tapi tetap panas".to_string(),
            vote_score: 0,
            answers_count: 0,
            is_deleted,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_answer() -> answer::Model {
        answer::Model {
            id: "a1".to_string(),
            discussion_id: "d1".to_string(),
            user_id: Some("user2".to_string()),
            content: "Ganti thermal paste".to_string(),
            vote_score: 0,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_deleted_discussion_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion(true)]])
                .into_connection(),
        );

        let service = ContentService::new(ContentRepository::new(db));
        let result = service.get_discussion("d1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_answer_bumps_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion(false)]])
                .append_query_results([[create_test_answer()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ContentService::new(ContentRepository::new(db));
        let result = service
            .create_answer(
                "user2",
                "d1",
                CreatePostInput {
                    content: "Ganti thermal paste".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.discussion_id, "d1");
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ContentService::new(ContentRepository::new(db));
        let result = service
            .create_discussion(
                "user1",
                CreateDiscussionInput {
                    title: String::new(),
                    content: "body".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
