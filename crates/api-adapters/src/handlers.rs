//! # api-adapters Handlers
//!
//! This module coordinates the flow between HTTP requests and the content store.
//! Every response carrying posts is redacted so anonymous authors stay anonymous.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domains::{
    ActivityItem, AppError, ChatSession, Comment, Group, Message, Post, PostDraft, Reaction,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

fn redact_all(posts: Vec<Post>) -> Vec<Post> {
    posts.iter().map(Post::redacted).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroupRequest {
    pub name: String,
    pub description: String,
    pub background_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub reaction: Reaction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub text: String,
    pub parent_comment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChatRequest {
    pub peer_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub text: String,
    pub post_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    pub unread: usize,
    pub items: Vec<ActivityItem>,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state
        .metrics
        .render()
        .map_err(|e| AppError::Internal(format!("metrics encoding failed: {}", e)))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

// --- Groups ---

pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<Group>> {
    Json(state.store.read().await.list_groups())
}

pub async fn create_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<NewGroupRequest>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let user = user.require()?;
    let mut group = Group::new(req.name.trim(), req.description.trim()).created_by(user.id.clone());
    group.background_image = req.background_image;

    let mut store = state.store.write().await;
    store.register_user(user);
    let group = store.add_group(group)?;
    state.metrics.groups_created.inc();
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Json<Group>> {
    state
        .store
        .read()
        .await
        .get_group_by_id(&group_id)
        .map(Json)
        .ok_or_else(|| ApiError(AppError::not_found("Group", &group_id)))
}

pub async fn group_posts(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Json<Vec<Post>> {
    Json(redact_all(state.store.read().await.get_posts_by_group_id(&group_id)))
}

// --- Posts ---

pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(redact_all(state.store.read().await.get_all_posts()))
}

pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(draft): Json<PostDraft>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let user = user.require()?;
    match state.publisher.publish_post(draft, Some(&user)).await {
        Ok(post) => {
            state.metrics.posts_published.inc();
            Ok((StatusCode::CREATED, Json(post.redacted())))
        }
        Err(e) => {
            if matches!(e, AppError::Rejected(_)) {
                state.metrics.posts_rejected.inc();
            }
            Err(e.into())
        }
    }
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Post>> {
    state
        .store
        .read()
        .await
        .get_post_by_id(&post_id)
        .map(|p| Json(p.redacted()))
        .ok_or_else(|| ApiError(AppError::not_found("Post", &post_id)))
}

pub async fn react_to_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<ReactRequest>,
) -> ApiResult<Json<Post>> {
    let user = user.require()?;
    let mut store = state.store.write().await;
    let user_id = user.id.clone();
    store.register_user(user);
    let post = store.react(&post_id, &user_id, req.reaction)?;
    Ok(Json(post.redacted()))
}

pub async fn post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Json<Vec<Comment>> {
    let comments = state.store.read().await.comments_for_post(&post_id);
    Json(comments.iter().map(Comment::redacted).collect())
}

pub async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<NewCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let user = user.require()?;
    let comment = state
        .publisher
        .publish_comment(&post_id, &user, &req.text, req.parent_comment_id.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(comment.redacted())))
}

// --- Chat ---

pub async fn start_chat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<StartChatRequest>,
) -> ApiResult<Json<ChatSession>> {
    let user = user.require()?;
    let mut store = state.store.write().await;
    let user_id = user.id.clone();
    store.register_user(user);
    let session = store.start_or_get_chat_session(&user_id, &req.peer_id)?;
    Ok(Json(session))
}

pub async fn list_chats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<ChatSession>>> {
    let user = user.require()?;
    Ok(Json(state.store.read().await.chat_sessions_for_user(&user.id)))
}

pub async fn chat_messages(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let user = user.require()?;
    let store = state.store.read().await;
    // Outsiders get the same answer as for a session that does not exist.
    match store.get_chat_session(&session_id) {
        Some(session) if session.has_participant(&user.id) => {
            Ok(Json(store.get_messages_for_chat_session(&session_id)))
        }
        _ => Err(ApiError(AppError::not_found("ChatSession", &session_id))),
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let user = user.require()?;
    let message = state.store.write().await.send_message(
        &session_id,
        &user.id,
        &req.text,
        req.post_id.as_deref(),
    )?;
    state.metrics.messages_sent.inc();
    Ok((StatusCode::CREATED, Json(message)))
}

// --- Activity ---

pub async fn list_activity(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ActivityFeed>> {
    let user = user.require()?;
    let store = state.store.read().await;
    Ok(Json(ActivityFeed {
        unread: store.unread_count(&user.id),
        items: store.activity_for_user(&user.id),
    }))
}

pub async fn mark_activity_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<String>,
) -> ApiResult<StatusCode> {
    let user = user.require()?;
    let mut store = state.store.write().await;
    // Items of other users are left untouched, same as unknown ids.
    if store
        .get_activity_item(&activity_id)
        .is_some_and(|item| item.user_id == user.id)
    {
        store.mark_as_read(&activity_id);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_activity_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<StatusCode> {
    let user = user.require()?;
    state.store.write().await.mark_all_as_read(&user.id);
    Ok(StatusCode::NO_CONTENT)
}
