//! HTTP API layer for olion.
//!
//! - **Endpoints**: accounts, content, reports, moderation, votes,
//!   bookmarks, reputation, notifications and Pakar applications
//! - **Extractors**: authenticated user
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8. Every handler returns either the success envelope
//! from [`response::ApiResponse`] or an [`olion_common::AppError`].

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
