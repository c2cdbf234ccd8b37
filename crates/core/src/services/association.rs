//! Vote and bookmark service.
//!
//! Dispatches on [`ContentSource`] to the matching association table and
//! delegates to the generic operations in [`AssociationRepository`].

use olion_common::{AppError, AppResult, IdGenerator};
use olion_db::{
    entities::{
        ContentSource, answer_bookmark, answer_vote, comment_vote, discussion_bookmark,
        discussion_vote,
    },
    repositories::{
        Association, AssociationRepository, ContentRepository, VoteAssociation, VoteChange,
    },
};
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde::{Deserialize, Serialize};

/// Input for casting a vote.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteInput {
    /// +1 or -1.
    pub value: i16,
}

/// State of a target after a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub source: ContentSource,
    pub target_id: String,
    /// The caller's vote after this call; `None` if it was withdrawn.
    pub my_vote: Option<i16>,
    pub vote_score: i32,
}

/// Association service for business logic.
#[derive(Clone)]
pub struct AssociationService {
    association_repo: AssociationRepository,
    content_repo: ContentRepository,
    id_gen: IdGenerator,
}

impl AssociationService {
    /// Create a new association service.
    #[must_use]
    pub const fn new(
        association_repo: AssociationRepository,
        content_repo: ContentRepository,
    ) -> Self {
        Self {
            association_repo,
            content_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Cast, switch or withdraw a vote and refresh the target's score.
    pub async fn vote(
        &self,
        user_id: &str,
        source: ContentSource,
        target_id: &str,
        input: VoteInput,
    ) -> AppResult<VoteResult> {
        if input.value != 1 && input.value != -1 {
            return Err(AppError::BadRequest(
                "Vote value must be 1 or -1".to_string(),
            ));
        }

        self.ensure_visible(source, target_id).await?;

        let (change, score) = match source {
            ContentSource::Discussion => {
                self.cast::<discussion_vote::Entity>(user_id, target_id, input.value)
                    .await?
            }
            ContentSource::Answer => {
                self.cast::<answer_vote::Entity>(user_id, target_id, input.value)
                    .await?
            }
            ContentSource::Comment => {
                self.cast::<comment_vote::Entity>(user_id, target_id, input.value)
                    .await?
            }
        };

        self.content_repo
            .set_vote_score(source, target_id, score)
            .await?;

        Ok(VoteResult {
            source,
            target_id: target_id.to_string(),
            my_vote: match change {
                VoteChange::Set(v) => Some(v),
                VoteChange::Removed => None,
            },
            vote_score: score,
        })
    }

    async fn cast<E>(
        &self,
        user_id: &str,
        target_id: &str,
        value: i16,
    ) -> AppResult<(VoteChange, i32)>
    where
        E: VoteAssociation,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
        E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    {
        let change = self
            .association_repo
            .vote::<E>(self.id_gen.generate(), user_id, target_id, value)
            .await?;
        let score = self.association_repo.tally::<E>(target_id).await?;
        Ok((change, score))
    }

    /// Toggle a bookmark. Returns whether the target is now bookmarked.
    pub async fn toggle_bookmark(
        &self,
        user_id: &str,
        source: ContentSource,
        target_id: &str,
    ) -> AppResult<bool> {
        ensure_bookmarkable(source)?;
        self.ensure_visible(source, target_id).await?;

        let id = self.id_gen.generate();
        match source {
            ContentSource::Discussion => {
                self.association_repo
                    .toggle::<discussion_bookmark::Entity>(id, user_id, target_id)
                    .await
            }
            ContentSource::Answer => {
                self.association_repo
                    .toggle::<answer_bookmark::Entity>(id, user_id, target_id)
                    .await
            }
            ContentSource::Comment => Err(not_bookmarkable(source)),
        }
    }

    /// IDs of the user's bookmarked targets, newest bookmark first.
    pub async fn list_bookmarks(
        &self,
        user_id: &str,
        source: ContentSource,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<String>> {
        ensure_bookmarkable(source)?;

        match source {
            ContentSource::Discussion => {
                self.bookmarked::<discussion_bookmark::Entity>(user_id, limit, offset)
                    .await
            }
            ContentSource::Answer => {
                self.bookmarked::<answer_bookmark::Entity>(user_id, limit, offset)
                    .await
            }
            ContentSource::Comment => Err(not_bookmarkable(source)),
        }
    }

    async fn bookmarked<E: Association>(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<String>> {
        let rows = self
            .association_repo
            .find_by_owner::<E>(user_id, limit, offset)
            .await?;
        Ok(rows.iter().map(|m| E::target_of(m).to_string()).collect())
    }

    async fn ensure_visible(&self, source: ContentSource, target_id: &str) -> AppResult<()> {
        self.content_repo
            .find_target(source, target_id)
            .await?
            .filter(|t| !t.is_deleted)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("{} {target_id} not found", source.label())))
    }
}

fn ensure_bookmarkable(source: ContentSource) -> AppResult<()> {
    match source {
        ContentSource::Discussion | ContentSource::Answer => Ok(()),
        ContentSource::Comment => Err(not_bookmarkable(source)),
    }
}

fn not_bookmarkable(source: ContentSource) -> AppError {
    AppError::InvalidSource(format!("{source} cannot be bookmarked"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use olion_db::entities::discussion;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_discussion() -> discussion::Model {
        discussion::Model {
            id: "d1".to_string(),
            user_id: Some("author".to_string()),
            title: "Title".to_string(),
            content: "Body".to_string(),
            vote_score: 0,
            answers_count: 0,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(assoc_db: DatabaseConnection, content_db: DatabaseConnection) -> AssociationService {
        AssociationService::new(
            AssociationRepository::new(Arc::new(assoc_db)),
            ContentRepository::new(Arc::new(content_db)),
        )
    }

    #[tokio::test]
    async fn test_invalid_vote_value() {
        let result = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        )
        .vote("user1", ContentSource::Discussion, "d1", VoteInput { value: 2 })
        .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_first_upvote_sets_score() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_discussion()]])
            .append_exec_results([exec(1)])
            .into_connection();
        let assoc_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<discussion_vote::Model>::new()])
            .append_exec_results([exec(1)])
            .append_query_results([
                [maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(1)) }],
                [maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(0)) }],
            ])
            .into_connection();

        let result = service(assoc_db, content_db)
            .vote("user1", ContentSource::Discussion, "d1", VoteInput { value: 1 })
            .await
            .unwrap();

        assert_eq!(result.my_vote, Some(1));
        assert_eq!(result.vote_score, 1);
    }

    #[tokio::test]
    async fn test_comment_bookmark_is_invalid_source() {
        let result = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        )
        .toggle_bookmark("user1", ContentSource::Comment, "c1")
        .await;

        assert!(matches!(result, Err(AppError::InvalidSource(_))));
    }

    #[tokio::test]
    async fn test_bookmark_toggle_on() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_discussion()]])
            .into_connection();
        let assoc_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(1)])
            .into_connection();

        let result = service(assoc_db, content_db)
            .toggle_bookmark("user1", ContentSource::Discussion, "d1")
            .await
            .unwrap();

        assert!(result);
    }
}
