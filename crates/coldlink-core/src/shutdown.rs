// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cooperative shutdown coordination.
//!
//! Every long-running loop in COLDLINK (replay tasks, the UDP forwarder,
//! the API server) stops cooperatively: it checks a token or listens on a
//! broadcast channel at its suspension points and releases its resources
//! before returning. Nothing is aborted mid-write.
//!
//! The coordinator lives in the core crate because both the loop crates and
//! the binary need the token type.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tracing::info;

// =============================================================================
// ShutdownCoordinator
// =============================================================================

/// Coordinates graceful shutdown across components.
///
/// # Example
///
/// ```
/// use coldlink_core::shutdown::ShutdownCoordinator;
///
/// let coordinator = ShutdownCoordinator::new();
/// let token = coordinator.token();
///
/// assert!(!token.is_stopped());
/// coordinator.initiate();
/// assert!(token.is_stopped());
/// ```
#[derive(Clone)]
pub struct ShutdownCoordinator {
    sender: broadcast::Sender<()>,
    initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Creates a new coordinator.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribes to the shutdown broadcast.
    ///
    /// Loops with a sleep point select on this receiver so the sleep is
    /// interrupted immediately on shutdown.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Returns a lightweight token for hot loops without a sleep point.
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            initiated: self.initiated.clone(),
        }
    }

    /// Initiates shutdown. Idempotent.
    pub fn initiate(&self) {
        if self
            .initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Shutdown initiated");
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` if shutdown has been initiated.
    pub fn is_initiated(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    /// Waits for an OS signal (or a manual [`initiate`](Self::initiate))
    /// and then marks shutdown.
    pub async fn wait_for_signal(&self) {
        if self.is_initiated() {
            return;
        }

        let mut manual = self.subscribe();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM"),
                _ = sigint.recv() => info!("Received SIGINT"),
                _ = manual.recv() => {}
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    result.expect("Failed to register Ctrl+C handler");
                    info!("Received Ctrl+C");
                }
                _ = manual.recv() => {}
            }
        }

        self.initiate();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ShutdownToken
// =============================================================================

/// A cloneable handle that hot loops poll between iterations.
#[derive(Clone)]
pub struct ShutdownToken {
    initiated: Arc<AtomicBool>,
}

impl ShutdownToken {
    /// Returns `true` if shutdown has been requested.
    pub fn is_stopped(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_initiate_notifies_subscribers() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx = coordinator.subscribe();

        assert!(!coordinator.is_initiated());
        coordinator.initiate();

        assert!(coordinator.is_initiated());
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_token_observes_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();

        assert!(!token.is_stopped());
        coordinator.initiate();
        assert!(token.is_stopped());
    }

    #[tokio::test]
    async fn test_initiate_is_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate();
        coordinator.initiate();
        assert!(coordinator.is_initiated());
    }

    #[tokio::test]
    async fn test_wait_for_signal_resolves_on_manual_initiate() {
        let coordinator = ShutdownCoordinator::new();

        let waiter = coordinator.clone();
        let handle = tokio::spawn(async move { waiter.wait_for_signal().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        coordinator.initiate();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("wait_for_signal should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx1 = coordinator.subscribe();
        let mut rx2 = coordinator.subscribe();

        coordinator.initiate();

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }
}
