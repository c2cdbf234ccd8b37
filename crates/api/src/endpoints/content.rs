//! Discussion, answer and comment endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use olion_common::AppResult;
use olion_core::{CreateDiscussionInput, CreatePostInput};
use olion_db::entities::{answer, comment, discussion};
use serde::{Deserialize, Serialize};

use super::PageQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Cursor pagination for the discussion feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(default = "default_feed_limit")]
    pub limit: u64,
    /// Only discussions older than this ID
    pub until_id: Option<String>,
}

const fn default_feed_limit() -> u64 {
    20
}

/// Discussion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub content: String,
    pub vote_score: i32,
    pub answers_count: i32,
    pub created_at: String,
}

impl From<discussion::Model> for DiscussionResponse {
    fn from(d: discussion::Model) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            title: d.title,
            content: d.content,
            vote_score: d.vote_score,
            answers_count: d.answers_count,
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// Answer or comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    /// Discussion (for answers) or answer (for comments)
    pub parent_id: String,
    pub user_id: Option<String>,
    pub content: String,
    pub vote_score: i32,
    pub created_at: String,
}

impl From<answer::Model> for PostResponse {
    fn from(a: answer::Model) -> Self {
        Self {
            id: a.id,
            parent_id: a.discussion_id,
            user_id: a.user_id,
            content: a.content,
            vote_score: a.vote_score,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

impl From<comment::Model> for PostResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            parent_id: c.answer_id,
            user_id: c.user_id,
            content: c.content,
            vote_score: c.vote_score,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

async fn create_discussion(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDiscussionInput>,
) -> AppResult<ApiResponse<DiscussionResponse>> {
    let discussion = state
        .content_service
        .create_discussion(&user.id, input)
        .await?;
    Ok(ApiResponse::created(discussion.into()))
}

/// Newest visible discussions first.
async fn list_discussions(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<Vec<DiscussionResponse>>> {
    let discussions = state
        .content_service
        .list_discussions(query.limit.min(100), query.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(
        discussions.into_iter().map(Into::into).collect(),
    ))
}

async fn get_discussion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DiscussionResponse>> {
    let discussion = state.content_service.get_discussion(&id).await?;
    Ok(ApiResponse::ok(discussion.into()))
}

async fn create_answer(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(discussion_id): Path<String>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let answer = state
        .content_service
        .create_answer(&user.id, &discussion_id, input)
        .await?;
    Ok(ApiResponse::created(answer.into()))
}

async fn list_answers(
    State(state): State<AppState>,
    Path(discussion_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let answers = state
        .content_service
        .list_answers(&discussion_id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(answers.into_iter().map(Into::into).collect()))
}

async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostResponse>> {
    let answer = state.content_service.get_answer(&id).await?;
    Ok(ApiResponse::ok(answer.into()))
}

async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(answer_id): Path<String>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let comment = state
        .content_service
        .create_comment(&user.id, &answer_id, input)
        .await?;
    Ok(ApiResponse::created(comment.into()))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(answer_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let comments = state
        .content_service
        .list_comments(&answer_id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(comments.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/discussions",
            get(list_discussions).post(create_discussion),
        )
        .route("/discussions/{id}", get(get_discussion))
        .route(
            "/discussions/{id}/answers",
            get(list_answers).post(create_answer),
        )
        .route("/answers/{id}", get(get_answer))
        .route(
            "/answers/{id}/comments",
            get(list_comments).post(create_comment),
        )
}
