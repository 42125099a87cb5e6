// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The client seam over the address space.
//!
//! Consumers (replay driver, REST façade, UDP forwarder) never touch the
//! [`AddressSpace`] directly; they hold a [`SpaceClient`] handle with an
//! explicit connect/disconnect lifecycle, injected at construction. There
//! is no ambient global connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::info;

use coldlink_core::error::{SpaceError, SpaceResult};
use coldlink_core::types::{TagPath, TagSample, Value};

use crate::space::AddressSpace;

// =============================================================================
// SpaceClient Trait
// =============================================================================

/// The interface every address-space consumer programs against.
///
/// # Lifecycle
///
/// 1. Create the client with its provider handle
/// 2. Call `connect()` before the first operation
/// 3. Use `browse()` / `read()` / `write()`
/// 4. Call `disconnect()` when done
///
/// Operations on a disconnected client fail with
/// [`SpaceError::Unavailable`]; that is the `Unavailable` branch callers
/// must keep distinguishable from `NotFound`.
#[async_trait]
pub trait SpaceClient: Send + Sync {
    /// Returns the human-readable name of this client instance.
    fn name(&self) -> &str;

    /// Establishes the connection.
    async fn connect(&self) -> SpaceResult<()>;

    /// Closes the connection.
    async fn disconnect(&self) -> SpaceResult<()>;

    /// Returns `true` if currently connected.
    fn is_connected(&self) -> bool;

    /// Returns the browse names of the children of the node at `segments`,
    /// in insertion order. An empty segment list browses the root.
    async fn browse(&self, segments: &[&str]) -> SpaceResult<Vec<String>>;

    /// Reads the current sample of a sensor leaf.
    async fn read(&self, path: &TagPath) -> SpaceResult<TagSample>;

    /// Writes a value into a sensor leaf.
    async fn write(&self, path: &TagPath, value: Value) -> SpaceResult<()>;
}

// =============================================================================
// InMemoryClient
// =============================================================================

/// A client bound to the in-process [`AddressSpace`].
pub struct InMemoryClient {
    name: String,
    space: Arc<AddressSpace>,
    connected: AtomicBool,
}

impl InMemoryClient {
    /// Creates a client over the given space. Starts disconnected.
    pub fn new(space: Arc<AddressSpace>) -> Self {
        Self {
            name: "in-memory".to_string(),
            space,
            connected: AtomicBool::new(false),
        }
    }

    /// Sets the client name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn ensure_connected(&self) -> SpaceResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SpaceError::unavailable("client is not connected"))
        }
    }
}

#[async_trait]
impl SpaceClient for InMemoryClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> SpaceResult<()> {
        self.connected.store(true, Ordering::SeqCst);
        info!(client = %self.name, "Connected to address space");
        Ok(())
    }

    async fn disconnect(&self) -> SpaceResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        info!(client = %self.name, "Disconnected from address space");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn browse(&self, segments: &[&str]) -> SpaceResult<Vec<String>> {
        self.ensure_connected()?;
        let node = self.space.resolve_by_path(segments)?;
        Ok(self
            .space
            .children(node)
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    async fn read(&self, path: &TagPath) -> SpaceResult<TagSample> {
        self.ensure_connected()?;
        self.space.read_leaf(path).await
    }

    async fn write(&self, path: &TagPath, value: Value) -> SpaceResult<()> {
        self.ensure_connected()?;
        self.space.write_leaf(path, value).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use coldlink_core::tree::{SensorKind, Topology};

    fn connected_client() -> InMemoryClient {
        let space = Arc::new(AddressSpace::from_topology(&Topology::recovered_default()));
        let client = InMemoryClient::new(space);
        client.connected.store(true, Ordering::SeqCst);
        client
    }

    #[tokio::test]
    async fn test_disconnected_client_is_unavailable() {
        let space = Arc::new(AddressSpace::new());
        let client = InMemoryClient::new(space);

        let err = client.browse(&[]).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, SpaceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_connect_lifecycle() {
        let space = Arc::new(AddressSpace::new());
        let client = InMemoryClient::new(space);

        assert!(!client.is_connected());
        client.connect().await.unwrap();
        assert!(client.is_connected());
        client.disconnect().await.unwrap();
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_browse_root_lists_sites() {
        let client = connected_client();
        let names = client.browse(&[]).await.unwrap();
        assert_eq!(names, vec!["Site1", "Site2"]);
    }

    #[tokio::test]
    async fn test_read_write_through_client() {
        let client = connected_client();
        let path = TagPath::new("Site2", "Location1", "Unit1", SensorKind::CondInPres);

        client.write(&path, Value::Numeric(3.25)).await.unwrap();
        let sample = client.read(&path).await.unwrap();
        assert_eq!(sample.value, Value::Numeric(3.25));
    }

    #[tokio::test]
    async fn test_browse_missing_path() {
        let client = connected_client();
        let err = client.browse(&["Site9"]).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
