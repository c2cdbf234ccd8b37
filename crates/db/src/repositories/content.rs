//! Content repository for discussions, answers and comments.
//!
//! Besides the typed accessors, this exposes the source-dispatched
//! operations moderation and voting need: look up a target's owner, hide
//! it, and write back its vote score.

use std::sync::Arc;

use crate::entities::{
    Answer, Comment, ContentSource, Discussion, answer, comment, discussion,
};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Owner and state of a piece of content, independent of its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTarget {
    pub source: ContentSource,
    pub id: String,
    /// `None` when the author account no longer exists.
    pub user_id: Option<String>,
    pub is_deleted: bool,
}

/// Content repository for database operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ========== Discussions ==========

    /// Create a new discussion.
    pub async fn create_discussion(
        &self,
        model: discussion::ActiveModel,
    ) -> AppResult<discussion::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a discussion by ID (including moderated ones).
    pub async fn find_discussion(&self, id: &str) -> AppResult<Option<discussion::Model>> {
        Discussion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get visible discussions (paginated, newest first).
    pub async fn list_discussions(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<discussion::Model>> {
        let mut query = Discussion::find()
            .filter(discussion::Column::IsDeleted.eq(false))
            .order_by_desc(discussion::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(discussion::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment answers count atomically.
    pub async fn increment_answers_count(&self, discussion_id: &str) -> AppResult<()> {
        Discussion::update_many()
            .col_expr(
                discussion::Column::AnswersCount,
                Expr::col(discussion::Column::AnswersCount).add(1),
            )
            .filter(discussion::Column::Id.eq(discussion_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ========== Answers ==========

    /// Create a new answer.
    pub async fn create_answer(&self, model: answer::ActiveModel) -> AppResult<answer::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an answer by ID.
    pub async fn find_answer(&self, id: &str) -> AppResult<Option<answer::Model>> {
        Answer::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get visible answers of a discussion, oldest first.
    pub async fn list_answers(
        &self,
        discussion_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<answer::Model>> {
        Answer::find()
            .filter(answer::Column::DiscussionId.eq(discussion_id))
            .filter(answer::Column::IsDeleted.eq(false))
            .order_by_asc(answer::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Comments ==========

    /// Create a new comment.
    pub async fn create_comment(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID.
    pub async fn find_comment(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get visible comments of an answer, oldest first.
    pub async fn list_comments(
        &self,
        answer_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::AnswerId.eq(answer_id))
            .filter(comment::Column::IsDeleted.eq(false))
            .order_by_asc(comment::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Source dispatch ==========

    /// Look up any content by source and ID.
    pub async fn find_target(
        &self,
        source: ContentSource,
        id: &str,
    ) -> AppResult<Option<ContentTarget>> {
        let target = match source {
            ContentSource::Discussion => self.find_discussion(id).await?.map(|d| ContentTarget {
                source,
                id: d.id,
                user_id: d.user_id,
                is_deleted: d.is_deleted,
            }),
            ContentSource::Answer => self.find_answer(id).await?.map(|a| ContentTarget {
                source,
                id: a.id,
                user_id: a.user_id,
                is_deleted: a.is_deleted,
            }),
            ContentSource::Comment => self.find_comment(id).await?.map(|c| ContentTarget {
                source,
                id: c.id,
                user_id: c.user_id,
                is_deleted: c.is_deleted,
            }),
        };

        Ok(target)
    }

    /// Set `is_deleted` on the target. Returns the number of rows touched.
    pub async fn mark_deleted(&self, source: ContentSource, id: &str) -> AppResult<u64> {
        let result = match source {
            ContentSource::Discussion => {
                Discussion::update_many()
                    .col_expr(discussion::Column::IsDeleted, Expr::value(true))
                    .filter(discussion::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Answer => {
                Answer::update_many()
                    .col_expr(answer::Column::IsDeleted, Expr::value(true))
                    .filter(answer::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Comment => {
                Comment::update_many()
                    .col_expr(comment::Column::IsDeleted, Expr::value(true))
                    .filter(comment::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Write back a recomputed vote score.
    pub async fn set_vote_score(&self, source: ContentSource, id: &str, score: i32) -> AppResult<()> {
        match source {
            ContentSource::Discussion => {
                Discussion::update_many()
                    .col_expr(discussion::Column::VoteScore, Expr::value(score))
                    .filter(discussion::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Answer => {
                Answer::update_many()
                    .col_expr(answer::Column::VoteScore, Expr::value(score))
                    .filter(answer::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Comment => {
                Comment::update_many()
                    .col_expr(comment::Column::VoteScore, Expr::value(score))
                    .filter(comment::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_answer(id: &str, user_id: Option<&str>) -> answer::Model {
        answer::Model {
            id: id.to_string(),
            discussion_id: "d1".to_string(),
            user_id: user_id.map(ToString::to_string),
            content: "Coba restart router".to_string(),
            vote_score: 0,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_target_dispatches_by_source() {
        let answer = create_test_answer("a1", Some("u1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[answer]])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let target = repo
            .find_target(ContentSource::Answer, "a1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(target.source, ContentSource::Answer);
        assert_eq!(target.user_id.as_deref(), Some("u1"));
        assert!(!target.is_deleted);
    }

    #[tokio::test]
    async fn test_find_target_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let target = repo.find_target(ContentSource::Comment, "c404").await.unwrap();

        assert!(target.is_none());
    }

    #[tokio::test]
    async fn test_mark_deleted_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let rows = repo
            .mark_deleted(ContentSource::Discussion, "d1")
            .await
            .unwrap();

        assert_eq!(rows, 1);
    }
}
