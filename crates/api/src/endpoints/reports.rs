//! Report endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use olion_common::AppResult;
use olion_core::CreateReportInput;
use olion_db::{entities::ReportStatus, repositories::Report};
use serde::{Deserialize, Serialize};

use super::{MAX_LIMIT, default_limit, parse_source};
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Report queue filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    /// `PENDING` or `RESOLVED`; all reports when absent
    pub status: Option<ReportStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Report queue page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub pending_count: u64,
}

/// Report a discussion, answer or comment.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((source, target_id)): Path<(String, String)>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<ApiResponse<Report>> {
    let source = parse_source(&source)?;
    let report = state
        .report_service
        .create(&user.id, source, &target_id, input)
        .await?;
    Ok(ApiResponse::created(report))
}

/// Report queue for one source (moderators only).
async fn list_reports(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<ReportListResponse>> {
    let source = parse_source(&source)?;
    auth.require_moderator()?;

    let reports = state
        .report_service
        .list(
            source,
            query.status,
            query.limit.min(MAX_LIMIT),
            query.offset,
        )
        .await?;
    let pending_count = state.report_service.count_pending(source).await?;

    Ok(ApiResponse::ok(ReportListResponse {
        reports,
        pending_count,
    }))
}

/// Get one report (moderators only).
async fn get_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((source, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<Report>> {
    let source = parse_source(&source)?;
    auth.require_moderator()?;

    let report = state.report_service.get(source, &id).await?;
    Ok(ApiResponse::ok(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{source}", get(list_reports))
        .route("/{source}/{id}", get(get_report).post(create_report))
}
