//! Generic repository for user-to-content association tables.
//!
//! Votes and bookmarks share one shape: a row per `(user, target)` pair,
//! unique on that pair. The five concrete tables implement [`Association`]
//! (and votes additionally [`VoteAssociation`]) so that toggling, voting and
//! tallying are written once.

use std::sync::Arc;

use crate::entities::{
    answer_bookmark, answer_vote, comment_vote, discussion_bookmark, discussion_vote,
};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    prelude::DateTimeWithTimeZone, sea_query::OnConflict,
};

/// A table linking a user to a piece of content, unique per pair.
pub trait Association: EntityTrait {
    /// Column holding the user ID.
    fn owner_column() -> Self::Column;

    /// Column holding the discussion/answer/comment ID.
    fn target_column() -> Self::Column;

    fn created_column() -> Self::Column;

    fn target_of(model: &Self::Model) -> &str;

    /// Build a row for insertion.
    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel;
}

/// An association that carries a +1/-1 value.
pub trait VoteAssociation: Association {
    fn value_column() -> Self::Column;

    fn value_of(model: &Self::Model) -> i16;

    fn with_value(row: Self::ActiveModel, value: i16) -> Self::ActiveModel;
}

/// Result of casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    /// The vote was created or switched to the given value.
    Set(i16),
    /// The same value was cast again and the vote was withdrawn.
    Removed,
}

/// Association repository for database operations.
#[derive(Clone)]
pub struct AssociationRepository {
    db: Arc<DatabaseConnection>,
}

impl AssociationRepository {
    /// Create a new association repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the row for a `(user, target)` pair.
    pub async fn find<E: Association>(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::owner_column().eq(user_id))
            .filter(E::target_column().eq(target_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Toggle the association and return whether it now exists.
    ///
    /// Deletes first; only if nothing was deleted is a row inserted, with
    /// `ON CONFLICT DO NOTHING` so a concurrent insert can't fail the call.
    pub async fn toggle<E>(&self, id: String, user_id: &str, target_id: &str) -> AppResult<bool>
    where
        E: Association,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let deleted = E::delete_many()
            .filter(E::owner_column().eq(user_id))
            .filter(E::target_column().eq(target_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            return Ok(false);
        }

        let row = E::new_row(
            id,
            user_id.to_string(),
            target_id.to_string(),
            chrono::Utc::now().into(),
        );

        E::insert(row)
            .on_conflict(
                OnConflict::columns([E::owner_column(), E::target_column()])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Cast a vote.
    ///
    /// Casting the value already stored withdraws the vote. Any other value
    /// is upserted on the `(user, target)` pair.
    pub async fn vote<E>(
        &self,
        id: String,
        user_id: &str,
        target_id: &str,
        value: i16,
    ) -> AppResult<VoteChange>
    where
        E: VoteAssociation,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        if let Some(existing) = self.find::<E>(user_id, target_id).await? {
            if E::value_of(&existing) == value {
                E::delete_many()
                    .filter(E::owner_column().eq(user_id))
                    .filter(E::target_column().eq(target_id))
                    .exec(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                return Ok(VoteChange::Removed);
            }
        }

        let row = E::with_value(
            E::new_row(
                id,
                user_id.to_string(),
                target_id.to_string(),
                chrono::Utc::now().into(),
            ),
            value,
        );

        E::insert(row)
            .on_conflict(
                OnConflict::columns([E::owner_column(), E::target_column()])
                    .update_column(E::value_column())
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(VoteChange::Set(value))
    }

    /// Upvotes minus downvotes for a target.
    pub async fn tally<E>(&self, target_id: &str) -> AppResult<i32>
    where
        E: VoteAssociation,
        E::Model: Sync,
    {
        let up = E::find()
            .filter(E::target_column().eq(target_id))
            .filter(E::value_column().eq(1i16))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let down = E::find()
            .filter(E::target_column().eq(target_id))
            .filter(E::value_column().eq(-1i16))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(up as i32 - down as i32)
    }

    /// A user's rows, newest first.
    pub async fn find_by_owner<E: Association>(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<E::Model>> {
        E::find()
            .filter(E::owner_column().eq(user_id))
            .order_by_desc(E::created_column())
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

// ========== Table bindings ==========

impl Association for discussion_vote::Entity {
    fn owner_column() -> Self::Column {
        discussion_vote::Column::UserId
    }

    fn target_column() -> Self::Column {
        discussion_vote::Column::DiscussionId
    }

    fn created_column() -> Self::Column {
        discussion_vote::Column::CreatedAt
    }

    fn target_of(model: &Self::Model) -> &str {
        &model.discussion_id
    }

    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel {
        discussion_vote::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            discussion_id: Set(target_id),
            value: Set(1),
            created_at: Set(created_at),
        }
    }
}

impl VoteAssociation for discussion_vote::Entity {
    fn value_column() -> Self::Column {
        discussion_vote::Column::Value
    }

    fn value_of(model: &Self::Model) -> i16 {
        model.value
    }

    fn with_value(mut row: Self::ActiveModel, value: i16) -> Self::ActiveModel {
        row.value = Set(value);
        row
    }
}

impl Association for answer_vote::Entity {
    fn owner_column() -> Self::Column {
        answer_vote::Column::UserId
    }

    fn target_column() -> Self::Column {
        answer_vote::Column::AnswerId
    }

    fn created_column() -> Self::Column {
        answer_vote::Column::CreatedAt
    }

    fn target_of(model: &Self::Model) -> &str {
        &model.answer_id
    }

    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel {
        answer_vote::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            answer_id: Set(target_id),
            value: Set(1),
            created_at: Set(created_at),
        }
    }
}

impl VoteAssociation for answer_vote::Entity {
    fn value_column() -> Self::Column {
        answer_vote::Column::Value
    }

    fn value_of(model: &Self::Model) -> i16 {
        model.value
    }

    fn with_value(mut row: Self::ActiveModel, value: i16) -> Self::ActiveModel {
        row.value = Set(value);
        row
    }
}

impl Association for comment_vote::Entity {
    fn owner_column() -> Self::Column {
        comment_vote::Column::UserId
    }

    fn target_column() -> Self::Column {
        comment_vote::Column::CommentId
    }

    fn created_column() -> Self::Column {
        comment_vote::Column::CreatedAt
    }

    fn target_of(model: &Self::Model) -> &str {
        &model.comment_id
    }

    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel {
        comment_vote::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            comment_id: Set(target_id),
            value: Set(1),
            created_at: Set(created_at),
        }
    }
}

impl VoteAssociation for comment_vote::Entity {
    fn value_column() -> Self::Column {
        comment_vote::Column::Value
    }

    fn value_of(model: &Self::Model) -> i16 {
        model.value
    }

    fn with_value(mut row: Self::ActiveModel, value: i16) -> Self::ActiveModel {
        row.value = Set(value);
        row
    }
}

impl Association for discussion_bookmark::Entity {
    fn owner_column() -> Self::Column {
        discussion_bookmark::Column::UserId
    }

    fn target_column() -> Self::Column {
        discussion_bookmark::Column::DiscussionId
    }

    fn created_column() -> Self::Column {
        discussion_bookmark::Column::CreatedAt
    }

    fn target_of(model: &Self::Model) -> &str {
        &model.discussion_id
    }

    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel {
        discussion_bookmark::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            discussion_id: Set(target_id),
            created_at: Set(created_at),
        }
    }
}

impl Association for answer_bookmark::Entity {
    fn owner_column() -> Self::Column {
        answer_bookmark::Column::UserId
    }

    fn target_column() -> Self::Column {
        answer_bookmark::Column::AnswerId
    }

    fn created_column() -> Self::Column {
        answer_bookmark::Column::CreatedAt
    }

    fn target_of(model: &Self::Model) -> &str {
        &model.answer_id
    }

    fn new_row(
        id: String,
        user_id: String,
        target_id: String,
        created_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel {
        answer_bookmark::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            answer_id: Set(target_id),
            created_at: Set(created_at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_vote(value: i16) -> answer_vote::Model {
        answer_vote::Model {
            id: "v1".to_string(),
            user_id: "user1".to_string(),
            answer_id: "a1".to_string(),
            value,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_bookmark() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = AssociationRepository::new(db);
        let bookmarked = repo
            .toggle::<discussion_bookmark::Entity>("b1".to_string(), "user1", "d1")
            .await
            .unwrap();

        assert!(!bookmarked);
    }

    #[tokio::test]
    async fn test_toggle_inserts_missing_bookmark() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(1)])
                .into_connection(),
        );

        let repo = AssociationRepository::new(db);
        let bookmarked = repo
            .toggle::<answer_bookmark::Entity>("b1".to_string(), "user1", "a1")
            .await
            .unwrap();

        assert!(bookmarked);
    }

    #[tokio::test]
    async fn test_same_vote_twice_withdraws() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_vote(1)]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = AssociationRepository::new(db);
        let change = repo
            .vote::<answer_vote::Entity>("v2".to_string(), "user1", "a1", 1)
            .await
            .unwrap();

        assert_eq!(change, VoteChange::Removed);
    }

    #[tokio::test]
    async fn test_opposite_vote_overwrites() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_vote(1)]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = AssociationRepository::new(db);
        let change = repo
            .vote::<answer_vote::Entity>("v2".to_string(), "user1", "a1", -1)
            .await
            .unwrap();

        assert_eq!(change, VoteChange::Set(-1));
    }

    #[tokio::test]
    async fn test_tally_subtracts_downvotes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(5)) }],
                    [maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(2)) }],
                ])
                .into_connection(),
        );

        let repo = AssociationRepository::new(db);
        let score = repo.tally::<comment_vote::Entity>("c1").await.unwrap();

        assert_eq!(score, 3);
    }
}
