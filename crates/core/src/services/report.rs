//! Report service.

use olion_common::{AppError, AppResult, IdGenerator};
use olion_db::{
    entities::{ContentSource, ReportStatus},
    repositories::{ContentRepository, NewReport, Report, ReportRepository},
};
use serde::Deserialize;
use validator::Validate;

/// Maximum reason length, in characters, after trimming.
const MAX_REASON_LENGTH: usize = 1000;

/// Input for reporting a piece of content.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportInput {
    pub reason: String,

    /// Higher is more urgent.
    #[validate(range(min = 0, max = 10))]
    pub priority: Option<i16>,
}

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    content_repo: ContentRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository, content_repo: ContentRepository) -> Self {
        Self {
            report_repo,
            content_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Report a discussion, answer or comment.
    pub async fn create(
        &self,
        reporter_id: &str,
        source: ContentSource,
        target_id: &str,
        input: CreateReportInput,
    ) -> AppResult<Report> {
        input.validate()?;

        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(AppError::BadRequest("Report reason is required".to_string()));
        }
        if reason.chars().count() > MAX_REASON_LENGTH {
            return Err(AppError::BadRequest("Report reason too long".to_string()));
        }

        let target = self
            .content_repo
            .find_target(source, target_id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("{} {target_id} not found", source.label())))?;

        if target.user_id.as_deref() == Some(reporter_id) {
            return Err(AppError::BadRequest(
                "Cannot report your own content".to_string(),
            ));
        }

        if self
            .report_repo
            .find_pending_by_reporter(source, reporter_id, target_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "You already have a pending report on this {}",
                source.label()
            )));
        }

        self.report_repo
            .create(
                source,
                NewReport {
                    id: self.id_gen.generate(),
                    reporter_id: reporter_id.to_string(),
                    target_id: target_id.to_string(),
                    reason: reason.to_string(),
                    priority: input.priority,
                },
            )
            .await
    }

    /// Get a report by ID.
    pub async fn get(&self, source: ContentSource, id: &str) -> AppResult<Report> {
        self.report_repo.get_by_id(source, id).await
    }

    /// List reports for the moderation queue.
    pub async fn list(
        &self,
        source: ContentSource,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Report>> {
        self.report_repo.list(source, status, limit, offset).await
    }

    /// Count pending reports in one source.
    pub async fn count_pending(&self, source: ContentSource) -> AppResult<u64> {
        self.report_repo.count_pending(source).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use olion_db::entities::{comment, comment_report};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_comment(user_id: &str, is_deleted: bool) -> comment::Model {
        comment::Model {
            id: "c1".to_string(),
            answer_id: "a1".to_string(),
            user_id: Some(user_id.to_string()),
            content: "Buy followers here".to_string(),
            vote_score: 0,
            is_deleted,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_report() -> comment_report::Model {
        comment_report::Model {
            id: "r1".to_string(),
            reporter_id: "reporter1".to_string(),
            comment_id: "c1".to_string(),
            reason: "spam".to_string(),
            priority: Some(3),
            status: ReportStatus::Pending,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    fn input(reason: &str) -> CreateReportInput {
        CreateReportInput {
            reason: reason.to_string(),
            priority: Some(3),
        }
    }

    fn service(report_db: DatabaseConnection, content_db: DatabaseConnection) -> ReportService {
        ReportService::new(
            ReportRepository::new(Arc::new(report_db)),
            ContentRepository::new(Arc::new(content_db)),
        )
    }

    #[tokio::test]
    async fn test_create_report() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment("author1", false)]])
            .into_connection();
        let report_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment_report::Model>::new()])
            .append_query_results([[create_test_report()]])
            .into_connection();

        let result = service(report_db, content_db)
            .create("reporter1", ContentSource::Comment, "c1", input("  spam  "))
            .await
            .unwrap();

        assert_eq!(result.source, ContentSource::Comment);
        assert_eq!(result.target_id, "c1");
        assert_eq!(result.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_blank_reason_rejected() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let report_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(report_db, content_db)
            .create("reporter1", ContentSource::Comment, "c1", input("   "))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_cannot_report_own_content() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment("reporter1", false)]])
            .into_connection();
        let report_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(report_db, content_db)
            .create("reporter1", ContentSource::Comment, "c1", input("spam"))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_deleted_content_not_reportable() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment("author1", true)]])
            .into_connection();
        let report_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(report_db, content_db)
            .create("reporter1", ContentSource::Comment, "c1", input("spam"))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_pending_report_conflicts() {
        let content_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment("author1", false)]])
            .into_connection();
        let report_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_report()]])
            .into_connection();

        let result = service(report_db, content_db)
            .create("reporter1", ContentSource::Comment, "c1", input("spam"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
