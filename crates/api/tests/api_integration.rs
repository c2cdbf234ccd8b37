//! API integration tests.
//!
//! Drive the router with `tower::ServiceExt::oneshot` against a mock
//! database. Handlers that need a user read it from request extensions,
//! so most tests attach one directly instead of going through the
//! token middleware.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use olion_api::{AppState, auth_middleware, router};
use olion_common::{
    Config,
    config::{AuthConfig, DatabaseConfig, ReputationConfig, ServerConfig},
};
use olion_core::{
    AssociationService, ContentService, ModerationService, NotificationService, PakarService,
    ReportService, ReputationService, TokenService, UserService,
};
use olion_db::{
    entities::{
        ContentSource, ModerationAction, NotificationChannel, ReportStatus, UserRole, discussion,
        discussion_report, moderation, notification, reputation, user,
    },
    repositories::{
        AssociationRepository, ContentRepository, ModerationRepository, NotificationRepository,
        PakarApplicationRepository, ReportRepository, ReputationRepository, UserRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/olion_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-secret".to_string(),
            token_ttl_hours: 1,
        },
        reputation: ReputationConfig::default(),
    }
}

/// Create the application state with every repository on one connection.
fn create_test_state(db: MockDatabase) -> AppState {
    let config = create_test_config();
    let db: Arc<DatabaseConnection> = Arc::new(db.into_connection());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let content_repo = ContentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let reputation_repo = ReputationRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let association_repo = AssociationRepository::new(Arc::clone(&db));
    let application_repo = PakarApplicationRepository::new(Arc::clone(&db));

    let notification_service = NotificationService::new(notification_repo);
    let reputation_service = ReputationService::new(reputation_repo, user_repo.clone());

    AppState {
        user_service: UserService::new(user_repo.clone()),
        token_service: TokenService::new(&config),
        content_service: ContentService::new(content_repo.clone()),
        report_service: ReportService::new(report_repo.clone(), content_repo.clone()),
        moderation_service: ModerationService::new(
            report_repo,
            moderation_repo,
            content_repo.clone(),
            reputation_service.clone(),
            notification_service.clone(),
        ),
        reputation_service: reputation_service.clone(),
        notification_service: notification_service.clone(),
        association_service: AssociationService::new(association_repo, content_repo),
        pakar_service: PakarService::new(
            application_repo,
            user_repo,
            reputation_service,
            notification_service,
            &config,
        ),
    }
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Create the test router.
fn create_test_router(db: MockDatabase) -> Router {
    router().with_state(create_test_state(db))
}

fn create_test_user(id: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{id}@example.com"),
        password_hash: "hash".to_string(),
        name: None,
        role,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_report(status: ReportStatus) -> discussion_report::Model {
    discussion_report::Model {
        id: "r1".to_string(),
        reporter_id: "reporter1".to_string(),
        discussion_id: "d1".to_string(),
        reason: "spam".to_string(),
        priority: Some(3),
        status,
        created_at: Utc::now().into(),
        resolved_at: None,
    }
}

fn create_test_discussion() -> discussion::Model {
    discussion::Model {
        id: "d1".to_string(),
        user_id: Some("u1".to_string()),
        title: "Jual akun".to_string(),
        content: "Hubungi saya".to_string(),
        vote_score: 0,
        answers_count: 0,
        is_deleted: false,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_decision() -> moderation::Model {
    moderation::Model {
        id: "m1".to_string(),
        moderator_id: "mod1".to_string(),
        action: ModerationAction::Delete,
        source: ContentSource::Discussion,
        note: Some("spam".to_string()),
        discussion_report_id: Some("r1".to_string()),
        answer_report_id: None,
        comment_report_id: None,
        created_at: Utc::now().into(),
    }
}

fn create_test_entry() -> reputation::Model {
    reputation::Model {
        id: "rep1".to_string(),
        user_id: "u1".to_string(),
        delta: -10,
        reason: "Delete".to_string(),
        source: ContentSource::Discussion,
        moderation_id: Some("m1".to_string()),
        created_at: Utc::now().into(),
    }
}

fn create_test_notification() -> notification::Model {
    notification::Model {
        id: "n1".to_string(),
        user_id: "u1".to_string(),
        title: "Your discussion was removed".to_string(),
        message: "A moderator reviewed a report on your discussion.".to_string(),
        channel: NotificationChannel::InApp,
        is_sent: true,
        is_read: false,
        created_at: Utc::now().into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn moderate_request(source: &str, user: Option<user::Model>) -> Request<Body> {
    let builder = Request::builder()
        .uri(format!("/moderate/{source}/r1"))
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    let builder = match user {
        Some(user) => builder.extension(user),
        None => builder,
    };
    builder
        .body(Body::from(r#"{"action":"Delete","note":"spam"}"#))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderate_without_auth_returns_401() {
    let app = create_test_router(empty_db());

    let response = app.oneshot(moderate_request("discussion", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_moderate_as_regular_user_returns_403() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(moderate_request(
            "discussion",
            Some(create_test_user("u2", UserRole::User)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_moderate_as_pakar_returns_403() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(moderate_request(
            "discussion",
            Some(create_test_user("p1", UserRole::Pakar)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_moderate_unknown_source_returns_400() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(moderate_request(
            "poll",
            Some(create_test_user("mod1", UserRole::Moderator)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_SOURCE");
}

#[tokio::test]
async fn test_moderate_delete_returns_decision() {
    let db = empty_db()
        .append_query_results([[create_test_report(ReportStatus::Pending)]])
        .append_query_results([[create_test_discussion()]])
        .append_query_results([[create_test_decision()]])
        .append_query_results([[create_test_user("u1", UserRole::User)]])
        .append_query_results([[create_test_entry()]])
        .append_query_results([[create_test_notification()]])
        // claim, then is_deleted
        .append_exec_results([exec(1), exec(1)]);
    let app = create_test_router(db);

    let response = app
        .oneshot(moderate_request(
            "DISCUSSION",
            Some(create_test_user("mod1", UserRole::Moderator)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["action"], "Delete");
    assert_eq!(body["data"]["source"], "DISCUSSION");
    assert_eq!(body["data"]["reportId"], "r1");
}

#[tokio::test]
async fn test_moderate_resolved_report_returns_400() {
    let db = empty_db().append_query_results([[create_test_report(ReportStatus::Resolved)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(moderate_request(
            "discussion",
            Some(create_test_user("admin1", UserRole::Admin)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "ALREADY_PROCESSED");
}

#[tokio::test]
async fn test_moderate_missing_report_returns_404() {
    let db = empty_db().append_query_results([Vec::<discussion_report::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(moderate_request(
            "discussion",
            Some(create_test_user("mod1", UserRole::Moderator)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    let db = empty_db().append_query_errors([sea_orm::DbErr::Custom(
        "connection reset by peer".to_string(),
    )]);
    let app = create_test_router(db);

    let response = app
        .oneshot(moderate_request(
            "discussion",
            Some(create_test_user("mod1", UserRole::Moderator)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_vote_with_invalid_value_returns_400() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes/answer/a1")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .extension(create_test_user("u2", UserRole::User))
                .body(Body::from(r#"{"value":2}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_bookmarks_are_invalid_source() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookmarks/comment")
                .extension(create_test_user("u2", UserRole::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_SOURCE");
}

#[tokio::test]
async fn test_report_queue_requires_moderator() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reports/discussion?status=PENDING")
                .extension(create_test_user("u2", UserRole::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_resolves_current_user() {
    let moderator = create_test_user("mod1", UserRole::Moderator);
    let token = TokenService::new(&create_test_config())
        .issue(&moderator)
        .unwrap();

    let db = empty_db()
        .append_query_results([[moderator.clone()]])
        .append_query_results([[maplit::btreemap! {
            "score" => sea_orm::Value::BigInt(Some(12))
        }]]);
    let state = create_test_state(db);
    let app = router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], "mod1");
    assert_eq!(body["data"]["role"], "MODERATOR");
    assert_eq!(body["data"]["reputation"], 12);
}

#[tokio::test]
async fn test_invalid_bearer_token_is_anonymous() {
    let state = create_test_state(empty_db());
    let app = router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moderate_unknown_action_returns_400_envelope() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/moderate/discussion/r1")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .extension(create_test_user("mod1", UserRole::Moderator))
                .body(Body::from(r#"{"action":"Ban"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_body_returns_400_envelope() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes/discussion/d1")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .extension(create_test_user("u2", UserRole::User))
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_missing_content_type_returns_400_envelope() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reports/discussion/d1")
                .method("POST")
                .extension(create_test_user("u2", UserRole::User))
                .body(Body::from(r#"{"reason":"spam"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_reputation_summary_uses_camel_case() {
    let db = empty_db()
        .append_query_results([[create_test_user("u1", UserRole::User)]])
        .append_query_results([[maplit::btreemap! {
            "score" => sea_orm::Value::BigInt(Some(-10))
        }]])
        .append_query_results([[create_test_entry()]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reputation/u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["userId"], "u1");
    assert_eq!(body["data"]["score"], -10);
    assert_eq!(body["data"]["entries"][0]["moderationId"], "m1");
    assert_eq!(body["data"]["entries"][0]["source"], "DISCUSSION");
    assert!(body["data"].get("user_id").is_none());
}
