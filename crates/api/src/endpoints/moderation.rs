//! Moderation endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use olion_common::AppResult;
use olion_core::ModerateInput;
use olion_db::entities::{ContentSource, ModerationAction, moderation};
use serde::Serialize;

use super::{PageQuery, parse_source};
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Moderation decision response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub id: String,
    pub moderator_id: String,
    pub action: ModerationAction,
    pub source: ContentSource,
    pub report_id: Option<String>,
    pub note: Option<String>,
    pub created_at: String,
}

impl From<moderation::Model> for DecisionResponse {
    fn from(m: moderation::Model) -> Self {
        Self {
            report_id: m.report_id().map(str::to_owned),
            id: m.id,
            moderator_id: m.moderator_id,
            action: m.action,
            source: m.source,
            note: m.note,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Resolve a pending report (moderators only).
async fn moderate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((source, report_id)): Path<(String, String)>,
    Json(input): Json<ModerateInput>,
) -> AppResult<ApiResponse<DecisionResponse>> {
    auth.require_moderator()?;
    let source = parse_source(&source)?;

    let decision = state
        .moderation_service
        .moderate(&auth.0.id, source, &report_id, input)
        .await?;

    Ok(ApiResponse::ok(decision.into()))
}

/// Decisions taken by the calling moderator, newest first.
async fn my_decisions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<DecisionResponse>>> {
    auth.require_moderator()?;

    let decisions = state
        .moderation_service
        .get_decisions_by_moderator(&auth.0.id, page.limit(), page.offset)
        .await?;

    Ok(ApiResponse::ok(decisions.into_iter().map(Into::into).collect()))
}

async fn get_decision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DecisionResponse>> {
    auth.require_moderator()?;

    let decision = state.moderation_service.get_decision(&id).await?;
    Ok(ApiResponse::ok(decision.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/moderate/{source}/{report_id}", post(moderate))
        .route("/moderation/decisions", get(my_decisions))
        .route("/moderation/decisions/{id}", get(get_decision))
}
