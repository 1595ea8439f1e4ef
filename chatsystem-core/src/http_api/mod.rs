//! HTTP API for ChatSystem
//!
//! Maps the chat core onto the REST surface the service has always exposed:
//! `PUT` creates, `GET` reads, `DELETE` removes, rooted at `/channels`.

pub mod api;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use api::build_router;
pub use handlers::{ApiError, ApiResult};
pub use server::{start_server, ChatServer};
pub use state::AppState;
