//! Pakar application endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use olion_common::{AppError, AppResult};
use olion_core::{ApplyInput, ReviewInput};
use olion_db::entities::{ApplicationStatus, pakar_application};
use serde::{Deserialize, Serialize};

use super::{MAX_LIMIT, default_limit};
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsQuery {
    /// `PENDING`, `APPROVED` or `REJECTED`
    pub status: Option<ApplicationStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Application response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub field: String,
    pub description: String,
    pub status: ApplicationStatus,
    pub reviewed_by: Option<String>,
    pub review_note: Option<String>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
}

impl From<pakar_application::Model> for ApplicationResponse {
    fn from(a: pakar_application::Model) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            field: a.field,
            description: a.description,
            status: a.status,
            reviewed_by: a.reviewed_by,
            review_note: a.review_note,
            created_at: a.created_at.to_rfc3339(),
            reviewed_at: a.reviewed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Apply for the Pakar role.
async fn apply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ApplyInput>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state.pakar_service.apply(&user.id, input).await?;
    Ok(ApiResponse::created(application.into()))
}

/// Review queue (admin only).
async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> AppResult<ApiResponse<Vec<ApplicationResponse>>> {
    auth.require_admin()?;

    let applications = state
        .pakar_service
        .list(query.status, query.limit.min(MAX_LIMIT), query.offset)
        .await?;
    Ok(ApiResponse::ok(
        applications.into_iter().map(Into::into).collect(),
    ))
}

/// Visible to the applicant and to admins.
async fn get_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state.pakar_service.get(&id).await?;
    if application.user_id != auth.0.id {
        auth.require_admin()
            .map_err(|_| AppError::NotFound(format!("Application {id} not found")))?;
    }
    Ok(ApiResponse::ok(application.into()))
}

async fn approve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state.pakar_service.approve(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(application.into()))
}

async fn reject(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state.pakar_service.reject(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(application.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list_applications).post(apply))
        .route("/applications/{id}", get(get_application))
        .route("/applications/{id}/approve", post(approve))
        .route("/applications/{id}/reject", post(reject))
}
