//! API routes definition

use super::handlers;
use super::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Build the API router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        // Channel routes
        .route("/channels", put(handlers::create_channel))
        .route(
            "/channels/:id",
            get(handlers::get_channel).delete(handlers::delete_channel),
        )
        // Message routes
        .route(
            "/channels/:id/messages",
            put(handlers::post_message).get(handlers::list_messages),
        )
        // Member routes
        .route(
            "/channels/:id/members",
            put(handlers::add_member).get(handlers::list_members),
        )
        .route("/channels/:id/members/:member", delete(handlers::remove_member))
        // Health
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(log_requests))
        .layer(DefaultBodyLimit::max(body_limit))
        // State
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Handled request"
    );
    response
}
