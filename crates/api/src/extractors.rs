//! Request extractors.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use olion_common::AppError;
use olion_db::entities::{UserRole, user};

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

impl AuthUser {
    /// Require the MODERATOR or ADMIN role.
    pub fn require_moderator(&self) -> Result<(), AppError> {
        if self.0.role.can_moderate() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Moderator or admin role required".to_string(),
            ))
        }
    }

    /// Require the ADMIN role.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);
