//! Reputation ledger service.

use olion_common::{AppResult, IdGenerator};
use olion_db::{
    entities::{ContentSource, reputation},
    repositories::{ReputationRepository, UserRepository},
};
use sea_orm::Set;

/// A user's score with the most recent ledger entries.
#[derive(Debug, Clone)]
pub struct ReputationSummary {
    pub user_id: String,
    pub score: i64,
    pub entries: Vec<reputation::Model>,
}

/// Reputation service for business logic.
#[derive(Clone)]
pub struct ReputationService {
    reputation_repo: ReputationRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReputationService {
    /// Create a new reputation service.
    #[must_use]
    pub const fn new(reputation_repo: ReputationRepository, user_repo: UserRepository) -> Self {
        Self {
            reputation_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append a ledger entry for an existing user.
    pub async fn add_entry(
        &self,
        user_id: &str,
        delta: i32,
        reason: &str,
        source: ContentSource,
        moderation_id: Option<&str>,
    ) -> AppResult<reputation::Model> {
        self.user_repo.get_by_id(user_id).await?;

        let model = reputation::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            delta: Set(delta),
            reason: Set(reason.to_string()),
            source: Set(source),
            moderation_id: Set(moderation_id.map(ToString::to_string)),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.reputation_repo.create(model).await
    }

    /// Current score: the sum of all deltas, 0 for a user with no entries.
    pub async fn get_score(&self, user_id: &str) -> AppResult<i64> {
        self.reputation_repo.score_for_user(user_id).await
    }

    /// Score and recent entries for a user.
    pub async fn get_summary(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<ReputationSummary> {
        self.user_repo.get_by_id(user_id).await?;

        let score = self.reputation_repo.score_for_user(user_id).await?;
        let entries = self
            .reputation_repo
            .find_by_user(user_id, limit, offset)
            .await?;

        Ok(ReputationSummary {
            user_id: user_id.to_string(),
            score,
            entries,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use olion_common::AppError;
    use olion_db::entities::{UserRole, user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: None,
            role: UserRole::User,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_entry(delta: i32) -> reputation::Model {
        reputation::Model {
            id: "rep1".to_string(),
            user_id: "user1".to_string(),
            delta,
            reason: "Hide".to_string(),
            source: ContentSource::Discussion,
            moderation_id: Some("m1".to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_entry_for_unknown_user() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let rep_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ReputationService::new(
            ReputationRepository::new(rep_db),
            UserRepository::new(user_db),
        );
        let result = service
            .add_entry("ghost", -5, "Hide", ContentSource::Discussion, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_entry() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let rep_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry(-5)]])
                .into_connection(),
        );

        let service = ReputationService::new(
            ReputationRepository::new(rep_db),
            UserRepository::new(user_db),
        );
        let entry = service
            .add_entry("user1", -5, "Hide", ContentSource::Discussion, Some("m1"))
            .await
            .unwrap();

        assert_eq!(entry.delta, -5);
        assert_eq!(entry.moderation_id.as_deref(), Some("m1"));
    }

    #[tokio::test]
    async fn test_summary() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let rep_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "score" => sea_orm::Value::BigInt(Some(-7))
                }]])
                .append_query_results([[create_test_entry(-5), create_test_entry(-2)]])
                .into_connection(),
        );

        let service = ReputationService::new(
            ReputationRepository::new(rep_db),
            UserRepository::new(user_db),
        );
        let summary = service.get_summary("user1", 20, 0).await.unwrap();

        assert_eq!(summary.score, -7);
        assert_eq!(summary.entries.len(), 2);
    }
}
