//! Pakar application repository.

use std::sync::Arc;

use crate::entities::{ApplicationStatus, PakarApplication, pakar_application};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Pakar application repository for database operations.
#[derive(Clone)]
pub struct PakarApplicationRepository {
    db: Arc<DatabaseConnection>,
}

impl PakarApplicationRepository {
    /// Create a new pakar application repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new application.
    pub async fn create(
        &self,
        model: pakar_application::ActiveModel,
    ) -> AppResult<pakar_application::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an application by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<pakar_application::Model>> {
        PakarApplication::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an application by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<pakar_application::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
    }

    /// Find the user's pending application, if any.
    pub async fn find_pending_by_user(
        &self,
        user_id: &str,
    ) -> AppResult<Option<pakar_application::Model>> {
        PakarApplication::find()
            .filter(pakar_application::Column::UserId.eq(user_id))
            .filter(pakar_application::Column::Status.eq(ApplicationStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List applications, oldest first so the review queue is FIFO.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<pakar_application::Model>> {
        let mut query = PakarApplication::find().order_by_asc(pakar_application::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(pakar_application::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically record a review on a pending application.
    ///
    /// Returns `false` if the application was no longer pending.
    pub async fn review_if_pending(
        &self,
        id: &str,
        status: ApplicationStatus,
        reviewer_id: &str,
        note: Option<String>,
    ) -> AppResult<bool> {
        let result = PakarApplication::update_many()
            .col_expr(pakar_application::Column::Status, Expr::value(status))
            .col_expr(
                pakar_application::Column::ReviewedBy,
                Expr::value(reviewer_id.to_string()),
            )
            .col_expr(pakar_application::Column::ReviewNote, Expr::value(note))
            .col_expr(
                pakar_application::Column::ReviewedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(pakar_application::Column::Id.eq(id))
            .filter(pakar_application::Column::Status.eq(ApplicationStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }
}
