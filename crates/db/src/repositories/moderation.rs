//! Moderation decision repository.

use std::sync::Arc;

use crate::entities::{ContentSource, Moderation, moderation};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Moderation repository for database operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a moderation decision.
    pub async fn create(&self, model: moderation::ActiveModel) -> AppResult<moderation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a decision by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<moderation::Model>> {
        Moderation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the decision that resolved a report.
    pub async fn find_by_report(
        &self,
        source: ContentSource,
        report_id: &str,
    ) -> AppResult<Option<moderation::Model>> {
        let column = match source {
            ContentSource::Discussion => moderation::Column::DiscussionReportId,
            ContentSource::Answer => moderation::Column::AnswerReportId,
            ContentSource::Comment => moderation::Column::CommentReportId,
        };

        Moderation::find()
            .filter(column.eq(report_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Decisions taken by a moderator, newest first.
    pub async fn find_by_moderator(
        &self,
        moderator_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation::Model>> {
        Moderation::find()
            .filter(moderation::Column::ModeratorId.eq(moderator_id))
            .order_by_desc(moderation::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
