//! Reputation endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use olion_common::AppResult;
use olion_db::entities::{ContentSource, reputation};
use serde::Serialize;

use super::PageQuery;
use crate::{middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationResponse {
    pub user_id: String,
    pub score: i64,
    pub entries: Vec<ReputationEntryResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationEntryResponse {
    pub id: String,
    pub delta: i32,
    pub reason: String,
    pub source: ContentSource,
    pub moderation_id: Option<String>,
    pub created_at: String,
}

impl From<reputation::Model> for ReputationEntryResponse {
    fn from(e: reputation::Model) -> Self {
        Self {
            id: e.id,
            delta: e.delta,
            reason: e.reason,
            source: e.source,
            moderation_id: e.moderation_id,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// Score and ledger history of a user. Public.
async fn get_reputation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<ReputationResponse>> {
    let summary = state
        .reputation_service
        .get_summary(&user_id, page.limit(), page.offset)
        .await?;

    Ok(ApiResponse::ok(ReputationResponse {
        user_id: summary.user_id,
        score: summary.score,
        entries: summary.entries.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_reputation))
}
