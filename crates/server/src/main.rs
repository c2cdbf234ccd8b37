//! Olion server entry point.

use std::sync::Arc;

use axum::{Router, middleware};
use olion_api::{AppState, auth_middleware, router as api_router};
use olion_common::Config;
use olion_core::{
    AssociationService, ContentService, ModerationService, NotificationService, PakarService,
    ReportService, ReputationService, TokenService, UserService,
};
use olion_db::repositories::{
    AssociationRepository, ContentRepository, ModerationRepository, NotificationRepository,
    PakarApplicationRepository, ReportRepository, ReputationRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories into services.
fn build_state(config: &Config, db: &Arc<olion_db::DatabaseConnection>) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(db));
    let content_repo = ContentRepository::new(Arc::clone(db));
    let report_repo = ReportRepository::new(Arc::clone(db));
    let moderation_repo = ModerationRepository::new(Arc::clone(db));
    let reputation_repo = ReputationRepository::new(Arc::clone(db));
    let notification_repo = NotificationRepository::new(Arc::clone(db));
    let association_repo = AssociationRepository::new(Arc::clone(db));
    let application_repo = PakarApplicationRepository::new(Arc::clone(db));

    let notification_service = NotificationService::new(notification_repo);
    let reputation_service = ReputationService::new(reputation_repo, user_repo.clone());
    let moderation_service = ModerationService::new(
        report_repo.clone(),
        moderation_repo,
        content_repo.clone(),
        reputation_service.clone(),
        notification_service.clone(),
    );
    let pakar_service = PakarService::new(
        application_repo,
        user_repo.clone(),
        reputation_service.clone(),
        notification_service.clone(),
        config,
    );

    AppState {
        user_service: UserService::new(user_repo),
        token_service: TokenService::new(config),
        content_service: ContentService::new(content_repo.clone()),
        report_service: ReportService::new(report_repo, content_repo.clone()),
        moderation_service,
        reputation_service,
        notification_service,
        association_service: AssociationService::new(association_repo, content_repo),
        pakar_service,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "olion=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting olion server...");

    // Load configuration
    let config = Config::load()?;

    let db = Arc::new(olion_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    olion_db::migrate(&db).await?;
    info!("Migrations completed");

    let state = build_state(&config, &db);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
