//! Bookmark endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use olion_common::AppResult;
use serde::Serialize;

use super::{PageQuery, parse_source};
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStateResponse {
    pub target_id: String,
    pub bookmarked: bool,
}

async fn toggle_bookmark(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((source, target_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<BookmarkStateResponse>> {
    let source = parse_source(&source)?;
    let bookmarked = state
        .association_service
        .toggle_bookmark(&user.id, source, &target_id)
        .await?;

    Ok(ApiResponse::ok(BookmarkStateResponse {
        target_id,
        bookmarked,
    }))
}

/// IDs of the caller's bookmarked discussions or answers.
async fn list_bookmarks(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let source = parse_source(&source)?;
    let ids = state
        .association_service
        .list_bookmarks(&user.id, source, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(ids))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{source}", get(list_bookmarks))
        .route("/{source}/{id}", post(toggle_bookmark))
}
