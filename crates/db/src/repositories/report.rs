//! Report repository.
//!
//! Reports live in three structurally identical tables, one per
//! [`ContentSource`]. Callers pick the table with the source; every
//! operation here is an exhaustive match over it, and results come back as
//! the table-independent [`Report`].

use std::sync::Arc;

use crate::entities::{
    AnswerReport, CommentReport, ContentSource, DiscussionReport, ReportStatus, answer_report,
    comment_report, discussion_report,
};
use olion_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, prelude::DateTimeWithTimeZone, sea_query::Expr,
    sea_query::NullOrdering,
};
use serde::Serialize;

/// A report, independent of which table stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub source: ContentSource,
    pub reporter_id: String,
    /// Discussion, answer or comment ID, depending on `source`.
    pub target_id: String,
    pub reason: String,
    pub priority: Option<i16>,
    pub status: ReportStatus,
    pub created_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

impl From<discussion_report::Model> for Report {
    fn from(r: discussion_report::Model) -> Self {
        Self {
            id: r.id,
            source: ContentSource::Discussion,
            reporter_id: r.reporter_id,
            target_id: r.discussion_id,
            reason: r.reason,
            priority: r.priority,
            status: r.status,
            created_at: r.created_at,
            resolved_at: r.resolved_at,
        }
    }
}

impl From<answer_report::Model> for Report {
    fn from(r: answer_report::Model) -> Self {
        Self {
            id: r.id,
            source: ContentSource::Answer,
            reporter_id: r.reporter_id,
            target_id: r.answer_id,
            reason: r.reason,
            priority: r.priority,
            status: r.status,
            created_at: r.created_at,
            resolved_at: r.resolved_at,
        }
    }
}

impl From<comment_report::Model> for Report {
    fn from(r: comment_report::Model) -> Self {
        Self {
            id: r.id,
            source: ContentSource::Comment,
            reporter_id: r.reporter_id,
            target_id: r.comment_id,
            reason: r.reason,
            priority: r.priority,
            status: r.status,
            created_at: r.created_at,
            resolved_at: r.resolved_at,
        }
    }
}

/// Fields of a new report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub id: String,
    pub reporter_id: String,
    pub target_id: String,
    pub reason: String,
    pub priority: Option<i16>,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new pending report.
    pub async fn create(&self, source: ContentSource, input: NewReport) -> AppResult<Report> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let report = match source {
            ContentSource::Discussion => discussion_report::ActiveModel {
                id: Set(input.id),
                reporter_id: Set(input.reporter_id),
                discussion_id: Set(input.target_id),
                reason: Set(input.reason),
                priority: Set(input.priority),
                status: Set(ReportStatus::Pending),
                created_at: Set(now),
                resolved_at: Set(None),
            }
            .insert(self.db.as_ref())
            .await
            .map(Report::from),
            ContentSource::Answer => answer_report::ActiveModel {
                id: Set(input.id),
                reporter_id: Set(input.reporter_id),
                answer_id: Set(input.target_id),
                reason: Set(input.reason),
                priority: Set(input.priority),
                status: Set(ReportStatus::Pending),
                created_at: Set(now),
                resolved_at: Set(None),
            }
            .insert(self.db.as_ref())
            .await
            .map(Report::from),
            ContentSource::Comment => comment_report::ActiveModel {
                id: Set(input.id),
                reporter_id: Set(input.reporter_id),
                comment_id: Set(input.target_id),
                reason: Set(input.reason),
                priority: Set(input.priority),
                status: Set(ReportStatus::Pending),
                created_at: Set(now),
                resolved_at: Set(None),
            }
            .insert(self.db.as_ref())
            .await
            .map(Report::from),
        };

        report.map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID in the table selected by `source`.
    pub async fn find_by_id(&self, source: ContentSource, id: &str) -> AppResult<Option<Report>> {
        let report = match source {
            ContentSource::Discussion => DiscussionReport::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
            ContentSource::Answer => AnswerReport::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
            ContentSource::Comment => CommentReport::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
        };

        report.map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, source: ContentSource, id: &str) -> AppResult<Report> {
        self.find_by_id(source, id).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} report {id} not found", source.label()))
        })
    }

    /// Find the reporter's pending report against a target, if any.
    pub async fn find_pending_by_reporter(
        &self,
        source: ContentSource,
        reporter_id: &str,
        target_id: &str,
    ) -> AppResult<Option<Report>> {
        let report = match source {
            ContentSource::Discussion => DiscussionReport::find()
                .filter(discussion_report::Column::ReporterId.eq(reporter_id))
                .filter(discussion_report::Column::DiscussionId.eq(target_id))
                .filter(discussion_report::Column::Status.eq(ReportStatus::Pending))
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
            ContentSource::Answer => AnswerReport::find()
                .filter(answer_report::Column::ReporterId.eq(reporter_id))
                .filter(answer_report::Column::AnswerId.eq(target_id))
                .filter(answer_report::Column::Status.eq(ReportStatus::Pending))
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
            ContentSource::Comment => CommentReport::find()
                .filter(comment_report::Column::ReporterId.eq(reporter_id))
                .filter(comment_report::Column::CommentId.eq(target_id))
                .filter(comment_report::Column::Status.eq(ReportStatus::Pending))
                .one(self.db.as_ref())
                .await
                .map(|r| r.map(Report::from)),
        };

        report.map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically move a report from `Pending` to `Resolved`.
    ///
    /// Issues `UPDATE ... WHERE id = ? AND status = 'pending'`. Returns
    /// `false` when no row matched, i.e. another request already resolved it.
    pub async fn resolve_if_pending(&self, source: ContentSource, id: &str) -> AppResult<bool> {
        let now = chrono::Utc::now();

        let result = match source {
            ContentSource::Discussion => {
                DiscussionReport::update_many()
                    .col_expr(
                        discussion_report::Column::Status,
                        Expr::value(ReportStatus::Resolved),
                    )
                    .col_expr(discussion_report::Column::ResolvedAt, Expr::value(now))
                    .filter(discussion_report::Column::Id.eq(id))
                    .filter(discussion_report::Column::Status.eq(ReportStatus::Pending))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Answer => {
                AnswerReport::update_many()
                    .col_expr(
                        answer_report::Column::Status,
                        Expr::value(ReportStatus::Resolved),
                    )
                    .col_expr(answer_report::Column::ResolvedAt, Expr::value(now))
                    .filter(answer_report::Column::Id.eq(id))
                    .filter(answer_report::Column::Status.eq(ReportStatus::Pending))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentSource::Comment => {
                CommentReport::update_many()
                    .col_expr(
                        comment_report::Column::Status,
                        Expr::value(ReportStatus::Resolved),
                    )
                    .col_expr(comment_report::Column::ResolvedAt, Expr::value(now))
                    .filter(comment_report::Column::Id.eq(id))
                    .filter(comment_report::Column::Status.eq(ReportStatus::Pending))
                    .exec(self.db.as_ref())
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// List reports, highest priority first, then newest.
    pub async fn list(
        &self,
        source: ContentSource,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Report>> {
        let reports = match source {
            ContentSource::Discussion => {
                let mut query = DiscussionReport::find()
                    .order_by_with_nulls(
                        discussion_report::Column::Priority,
                        sea_orm::Order::Desc,
                        NullOrdering::Last,
                    )
                    .order_by_desc(discussion_report::Column::CreatedAt);
                if let Some(s) = status {
                    query = query.filter(discussion_report::Column::Status.eq(s));
                }
                query
                    .offset(offset)
                    .limit(limit)
                    .all(self.db.as_ref())
                    .await
                    .map(|rs| rs.into_iter().map(Report::from).collect())
            }
            ContentSource::Answer => {
                let mut query = AnswerReport::find()
                    .order_by_with_nulls(
                        answer_report::Column::Priority,
                        sea_orm::Order::Desc,
                        NullOrdering::Last,
                    )
                    .order_by_desc(answer_report::Column::CreatedAt);
                if let Some(s) = status {
                    query = query.filter(answer_report::Column::Status.eq(s));
                }
                query
                    .offset(offset)
                    .limit(limit)
                    .all(self.db.as_ref())
                    .await
                    .map(|rs| rs.into_iter().map(Report::from).collect())
            }
            ContentSource::Comment => {
                let mut query = CommentReport::find()
                    .order_by_with_nulls(
                        comment_report::Column::Priority,
                        sea_orm::Order::Desc,
                        NullOrdering::Last,
                    )
                    .order_by_desc(comment_report::Column::CreatedAt);
                if let Some(s) = status {
                    query = query.filter(comment_report::Column::Status.eq(s));
                }
                query
                    .offset(offset)
                    .limit(limit)
                    .all(self.db.as_ref())
                    .await
                    .map(|rs| rs.into_iter().map(Report::from).collect())
            }
        };

        reports.map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count pending reports in one table.
    pub async fn count_pending(&self, source: ContentSource) -> AppResult<u64> {
        let count = match source {
            ContentSource::Discussion => {
                DiscussionReport::find()
                    .filter(discussion_report::Column::Status.eq(ReportStatus::Pending))
                    .count(self.db.as_ref())
                    .await
            }
            ContentSource::Answer => {
                AnswerReport::find()
                    .filter(answer_report::Column::Status.eq(ReportStatus::Pending))
                    .count(self.db.as_ref())
                    .await
            }
            ContentSource::Comment => {
                CommentReport::find()
                    .filter(comment_report::Column::Status.eq(ReportStatus::Pending))
                    .count(self.db.as_ref())
                    .await
            }
        };

        count.map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_report(id: &str, status: ReportStatus) -> discussion_report::Model {
        discussion_report::Model {
            id: id.to_string(),
            reporter_id: "reporter1".to_string(),
            discussion_id: "d1".to_string(),
            reason: "spam".to_string(),
            priority: Some(2),
            status,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_target() {
        let report = create_test_report("r1", ReportStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .find_by_id(ContentSource::Discussion, "r1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.source, ContentSource::Discussion);
        assert_eq!(result.target_id, "d1");
        assert_eq!(result.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<answer_report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id(ContentSource::Answer, "r1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_if_pending_claims_once() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);

        assert!(
            repo.resolve_if_pending(ContentSource::Discussion, "r1")
                .await
                .unwrap()
        );
        assert!(
            !repo
                .resolve_if_pending(ContentSource::Discussion, "r1")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_pending() {
        let r1 = create_test_report("r1", ReportStatus::Pending);
        let r2 = create_test_report("r2", ReportStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .list(ContentSource::Discussion, Some(ReportStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.source == ContentSource::Discussion));
    }
}
