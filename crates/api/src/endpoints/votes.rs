//! Vote endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use olion_common::AppResult;
use olion_core::{VoteInput, VoteResult};

use super::parse_source;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Cast `{"value": 1}` or `{"value": -1}`. Repeating the same value
/// withdraws the vote.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((source, target_id)): Path<(String, String)>,
    Json(input): Json<VoteInput>,
) -> AppResult<ApiResponse<VoteResult>> {
    let source = parse_source(&source)?;
    let result = state
        .association_service
        .vote(&user.id, source, &target_id, input)
        .await?;
    Ok(ApiResponse::ok(result))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{source}/{id}", post(vote))
}
