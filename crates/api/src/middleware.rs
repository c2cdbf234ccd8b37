//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use olion_core::{
    AssociationService, ContentService, ModerationService, NotificationService, PakarService,
    ReportService, ReputationService, TokenService, UserService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub token_service: TokenService,
    pub content_service: ContentService,
    pub report_service: ReportService,
    pub moderation_service: ModerationService,
    pub reputation_service: ReputationService,
    pub notification_service: NotificationService,
    pub association_service: AssociationService,
    pub pakar_service: PakarService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <jwt>` to a user and stores it in the
/// request extensions. Requests without a valid token pass through
/// anonymously; handlers that need a user reject them via `AuthUser`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    if let Some(token) = token {
        match state.token_service.verify(&token) {
            Ok(claims) => match state.user_service.get(&claims.sub).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(e) => debug!(user_id = %claims.sub, error = %e, "Token subject not found"),
            },
            Err(e) => debug!(error = %e, "Rejected bearer token"),
        }
    }

    next.run(req).await
}
