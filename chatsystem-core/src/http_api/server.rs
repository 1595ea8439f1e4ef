//! HTTP server implementation

use super::api::build_router;
use super::state::AppState;
use crate::config::Config;
use crate::core_chat::ChatService;
use crate::shutdown::ShutdownCoordinator;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// HTTP front end for a [`ChatService`]
pub struct ChatServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl ChatServer {
    pub fn new(service: Arc<ChatService>, addr: SocketAddr, max_body_bytes: usize) -> Self {
        let state = Arc::new(AppState::new(service, max_body_bytes));
        Self { state, addr }
    }

    pub fn from_config(service: Arc<ChatService>, config: &Config) -> Self {
        Self::new(service, config.server.bind_address, config.server.max_body_bytes)
    }

    /// Bind the listener; split from [`ChatServer::serve`] so callers can learn
    /// the actual port when binding to port 0
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("ChatSystem HTTP API listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Serve until `shutdown` fires, then drain for at most its grace period
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Result<()> {
        let router = build_router(self.state);
        let signal = {
            let shutdown = shutdown.clone();
            async move {
                shutdown.wait_for_shutdown().await;
            }
        };

        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
        });

        tokio::select! {
            finished = &mut server => {
                finished??;
                shutdown.mark_stopped();
                return Ok(());
            }
            _ = shutdown.wait_for_shutdown() => {}
        }

        match tokio::time::timeout(shutdown.grace_period(), &mut server).await {
            Ok(finished) => finished??,
            Err(_) => {
                warn!(
                    grace_period = ?shutdown.grace_period(),
                    "In-flight requests did not drain in time, aborting"
                );
                server.abort();
            }
        }

        shutdown.mark_stopped();
        Ok(())
    }

    /// Bind and serve
    pub async fn run(self, shutdown: Arc<ShutdownCoordinator>) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Convenience function: fresh in-memory service, signal-driven shutdown
pub async fn start_server(config: &Config) -> Result<()> {
    let service = Arc::new(ChatService::default());
    let shutdown = Arc::new(ShutdownCoordinator::new(config.server.shutdown_timeout));
    crate::shutdown::install_signal_handlers(shutdown.clone());

    ChatServer::from_config(service, config).run(shutdown).await
}
