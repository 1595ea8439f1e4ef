//! Server state shared across requests

use crate::core_chat::ChatService;
use std::sync::Arc;
use std::time::Instant;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Core facade; all channel data lives behind it
    pub service: Arc<ChatService>,

    /// Largest accepted request body
    pub max_body_bytes: usize,

    started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<ChatService>, max_body_bytes: usize) -> Self {
        Self {
            service,
            max_body_bytes,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
