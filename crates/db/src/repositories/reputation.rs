//! Reputation ledger repository.

use std::sync::Arc;

use crate::entities::{Reputation, reputation};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

#[derive(Debug, FromQueryResult)]
struct ScoreRow {
    score: Option<i64>,
}

/// Reputation repository for database operations.
#[derive(Clone)]
pub struct ReputationRepository {
    db: Arc<DatabaseConnection>,
}

impl ReputationRepository {
    /// Create a new reputation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a ledger entry. Entries are never updated.
    pub async fn create(&self, model: reputation::ActiveModel) -> AppResult<reputation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of all deltas for a user; 0 if the user has no entries.
    pub async fn score_for_user(&self, user_id: &str) -> AppResult<i64> {
        let row = Reputation::find()
            .select_only()
            .column_as(Expr::col(reputation::Column::Delta).sum(), "score")
            .filter(reputation::Column::UserId.eq(user_id))
            .into_model::<ScoreRow>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.and_then(|r| r.score).unwrap_or(0))
    }

    /// Ledger entries for a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<reputation::Model>> {
        Reputation::find()
            .filter(reputation::Column::UserId.eq(user_id))
            .order_by_desc(reputation::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_score_sums_entries() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "score" => sea_orm::Value::BigInt(Some(-15))
                }]])
                .into_connection(),
        );

        let repo = ReputationRepository::new(db);
        let score = repo.score_for_user("user1").await.unwrap();

        assert_eq!(score, -15);
    }

    #[tokio::test]
    async fn test_score_without_entries_is_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "score" => sea_orm::Value::BigInt(None)
                }]])
                .into_connection(),
        );

        let repo = ReputationRepository::new(db);
        let score = repo.score_for_user("user1").await.unwrap();

        assert_eq!(score, 0);
    }
}
