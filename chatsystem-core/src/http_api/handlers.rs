//! HTTP API handlers
//!
//! Handlers validate the request shape, call exactly one [`ChatService`]
//! operation and translate the outcome. Core errors map to status codes in
//! [`ApiError::into_response`].
//!
//! [`ChatService`]: crate::core_chat::ChatService

use super::state::AppState;
use super::types::*;
use crate::core_chat::{ChannelId, ChatError, MessageFilter, Principal, Timestamp};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),

    /// Rejected by the chat core
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApiError::Chat(err @ ChatError::ChannelExists(_)) => {
                (StatusCode::CONFLICT, err.kind())
            }
            ApiError::Chat(err) => (StatusCode::NOT_FOUND, err.kind()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let body = ErrorResponse {
            error: kind.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

/// Keeps the value only if it is present and not just whitespace
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Channel Handlers
// ============================================================================

/// PUT /channels - Create a channel
pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateChannelRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateChannelResponse>)> {
    let Json(req) = body?;
    let (Some(id), Some(owner)) = (non_blank(req.id), non_blank(req.owner)) else {
        return Err(bad_request("Invalid input, missing id or owner."));
    };

    let info = state
        .service
        .create_channel(ChannelId(id), req.topic.unwrap_or_default(), Principal(owner))
        .await?;

    Ok((StatusCode::CREATED, Json(CreateChannelResponse { id: info.id.0 })))
}

/// GET /channels/:id - Channel record
pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<ChannelResponse>> {
    let info = state.service.get_channel(&ChannelId(channel_id)).await?;
    Ok(Json(info.into()))
}

/// DELETE /channels/:id - Delete a channel with its messages and members
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.delete_channel(&ChannelId(channel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Message Handlers
// ============================================================================

/// PUT /channels/:id/messages - Post a message
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(req) = body?;
    let (Some(author), Some(text)) = (non_blank(req.author), req.text.filter(|t| !t.is_empty()))
    else {
        return Err(bad_request("Invalid input, missing text or author."));
    };

    let message = state
        .service
        .post_message(&ChannelId(channel_id), Principal(author), text)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// GET /channels/:id/messages?author=&startAt= - Filtered history
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let Query(query) = query?;

    let mut filter = MessageFilter::all();
    if let Some(author) = query.author.filter(|a| !a.is_empty()) {
        filter = filter.by_author(author);
    }
    if let Some(raw) = query.start_at.filter(|s| !s.is_empty()) {
        let start_at = raw
            .parse::<Timestamp>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        filter = filter.starting_at(start_at);
    }

    let messages = state
        .service
        .list_messages(&ChannelId(channel_id), &filter)
        .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

// ============================================================================
// Member Handlers
// ============================================================================

/// PUT /channels/:id/members - Register a member (idempotent)
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StatusResponse>)> {
    let Json(req) = body?;
    let member = non_blank(req.member)
        .ok_or_else(|| bad_request("Invalid input, missing or empty member name."))?;

    state
        .service
        .add_member(&ChannelId(channel_id), Principal(member))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            message: "Member added.".to_string(),
        }),
    ))
}

/// GET /channels/:id/members - Member names
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let members = state.service.list_members(&ChannelId(channel_id)).await?;
    Ok(Json(members.into_iter().map(|m| m.0).collect()))
}

/// DELETE /channels/:id/members/:member - Remove a member
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path((channel_id, member)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .service
        .remove_member(&ChannelId(channel_id), &Principal(member))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Health
// ============================================================================

/// GET /health - Liveness and channel count
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let channels = state.service.channel_count().await;
    info!(channels, "Health check");
    Json(HealthResponse {
        status: "healthy".to_string(),
        channels,
        uptime_seconds: state.uptime_seconds(),
    })
}
