//! API endpoints.

#![allow(missing_docs)]

mod auth;
mod bookmarks;
mod content;
mod moderation;
mod notifications;
mod pakar;
mod reports;
mod reputation;
mod votes;

use axum::Router;
use olion_common::AppResult;
use olion_db::entities::ContentSource;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(content::router())
        .nest("/reports", reports::router())
        .merge(moderation::router())
        .nest("/votes", votes::router())
        .nest("/bookmarks", bookmarks::router())
        .nest("/reputation", reputation::router())
        .nest("/notifications", notifications::router())
        .nest("/pakar", pakar::router())
}

/// Offset pagination shared by list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Maximum results (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl PageQuery {
    /// Limit clamped to the maximum page size.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}

const MAX_LIMIT: u64 = 100;

const fn default_limit() -> u64 {
    20
}

/// Parse the `{source}` path segment (case-insensitive).
fn parse_source(segment: &str) -> AppResult<ContentSource> {
    segment.parse()
}
