//! Shutdown coordination for the HTTP server
//!
//! The server moves through three phases:
//!
//! ```text
//! Serving --request_shutdown()--> Draining --mark_stopped()--> Stopped
//!    \______________________force_stop()_____________________/
//! ```
//!
//! The phase lives in a `watch` channel, so a waiter that subscribes after
//! shutdown was requested still sees it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Lifecycle phase of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting connections
    Serving,
    /// No new connections; in-flight requests may finish within the grace period
    Draining,
    Stopped,
}

pub struct ShutdownCoordinator {
    phase: watch::Sender<Phase>,
    grace_period: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        let (phase, _) = watch::channel(Phase::Serving);
        Self {
            phase,
            grace_period,
        }
    }

    /// How long in-flight requests may take once draining starts
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.phase() != Phase::Serving
    }

    /// Start draining; returns `false` if shutdown was already under way
    pub fn request_shutdown(&self) -> bool {
        let started = self.phase.send_if_modified(|phase| {
            if *phase == Phase::Serving {
                *phase = Phase::Draining;
                true
            } else {
                false
            }
        });

        if started {
            info!(grace_period = ?self.grace_period, "Draining HTTP connections");
        } else {
            warn!("Shutdown already requested");
        }
        started
    }

    /// Skip draining
    pub fn force_stop(&self) {
        warn!("Stopping without drain");
        self.phase.send_replace(Phase::Stopped);
    }

    /// Record that the listener has closed
    pub fn mark_stopped(&self) {
        self.phase.send_replace(Phase::Stopped);
        info!("Server stopped");
    }

    /// Resolve once the phase leaves `Serving`, with the phase observed
    pub async fn wait_for_shutdown(&self) -> Phase {
        let mut rx = self.phase.subscribe();
        let phase = match rx.wait_for(|phase| *phase != Phase::Serving).await {
            Ok(phase) => *phase,
            // Unreachable while `self` owns the sender
            Err(_) => Phase::Stopped,
        };
        phase
    }
}

/// Request shutdown on SIGTERM or SIGINT
#[cfg(unix)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Cannot listen for termination signals: {}", e);
                    return;
                }
            };

        let received = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!(signal = received, "Termination signal");
        coordinator.request_shutdown();
    });
}

/// Request shutdown on Ctrl+C
#[cfg(windows)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            return;
        }
        info!(signal = "Ctrl+C", "Termination signal");
        coordinator.request_shutdown();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let coordinator = ShutdownCoordinator::new(Duration::from_millis(100));
        assert_eq!(coordinator.phase(), Phase::Serving);
        assert!(!coordinator.is_shutting_down());

        assert!(coordinator.request_shutdown());
        assert_eq!(coordinator.phase(), Phase::Draining);
        assert!(!coordinator.request_shutdown());

        coordinator.mark_stopped();
        assert_eq!(coordinator.phase(), Phase::Stopped);
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_waiter_is_woken() {
        let coordinator = Arc::new(ShutdownCoordinator::new(Duration::from_secs(1)));
        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.wait_for_shutdown().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        coordinator.request_shutdown();

        assert_eq!(waiter.await.unwrap(), Phase::Draining);
    }

    #[tokio::test]
    async fn test_late_waiter_returns_immediately() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        coordinator.force_stop();

        let phase = tokio::time::timeout(Duration::from_secs(1), coordinator.wait_for_shutdown())
            .await
            .unwrap();
        assert_eq!(phase, Phase::Stopped);
    }
}
