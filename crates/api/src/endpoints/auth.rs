//! Authentication endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use olion_common::AppResult;
use olion_core::{SigninInput, SignupInput};
use olion_db::entities::{UserRole, user};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Signup/signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub token: String,
}

impl AuthResponse {
    fn new(user: user::Model, token: String) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            token,
        }
    }
}

/// Current user profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub reputation: i64,
    pub created_at: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = state.user_service.signup(input).await?;
    let token = state.token_service.issue(&user)?;

    Ok(ApiResponse::created(AuthResponse::new(user, token)))
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = state.user_service.signin(input).await?;
    let token = state.token_service.issue(&user)?;

    Ok(ApiResponse::ok(AuthResponse::new(user, token)))
}

/// Get the authenticated user with their reputation score.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MeResponse>> {
    let reputation = state.reputation_service.get_score(&user.id).await?;

    Ok(ApiResponse::ok(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        name: user.name,
        role: user.role,
        reputation,
        created_at: user.created_at.to_rfc3339(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/me", get(me))
}
