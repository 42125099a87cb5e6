// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The OPC-to-UDP bridge.
//!
//! Lifecycle: register the monitored nodes, `connect()` the socket, then
//! `run()` until the stop signal. Registration is closed once the run loop
//! starts; dynamic add/remove is out of scope.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use coldlink_core::error::{ForwardError, ForwardResult};
use coldlink_core::types::{TagPath, Value};

use coldlink_space::SpaceClient;

use crate::payload::{ForwardPayload, NodeSnapshot};

/// Backoff applied after an unexpected tick error before retrying.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

// =============================================================================
// BridgeSettings
// =============================================================================

/// Settings for the UDP bridge.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// The sink address datagrams are sent to.
    pub target: SocketAddr,

    /// Poll interval between ticks.
    pub interval: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            target: ([127, 0, 0, 1], 12345).into(),
            interval: Duration::from_millis(100),
        }
    }
}

// =============================================================================
// UdpBridge
// =============================================================================

/// A monitored leaf: path, alias, and the diffing state per run.
struct MonitoredNode {
    path: TagPath,
    alias: String,
}

/// Polls registered leaves and republishes changed snapshots over UDP.
pub struct UdpBridge {
    client: Arc<dyn SpaceClient>,
    settings: BridgeSettings,
    socket: Option<UdpSocket>,
    monitored: Vec<MonitoredNode>,
    last_values: BTreeMap<String, Value>,
}

impl UdpBridge {
    /// Creates a bridge reading through the given client.
    pub fn new(client: Arc<dyn SpaceClient>, settings: BridgeSettings) -> Self {
        Self {
            client,
            settings,
            socket: None,
            monitored: Vec::new(),
            last_values: BTreeMap::new(),
        }
    }

    /// Registers a leaf to monitor. Must happen before [`run`](Self::run).
    ///
    /// The leaf is read once to verify it exists; a dangling registration
    /// fails here instead of on every tick.
    pub async fn register(
        &mut self,
        path: TagPath,
        alias: impl Into<String>,
    ) -> ForwardResult<()> {
        let alias = alias.into();

        self.client
            .read(&path)
            .await
            .map_err(|source| ForwardError::register(&path, source))?;

        info!(tag = %path, alias = %alias, "Registered node");
        self.monitored.push(MonitoredNode { path, alias });
        Ok(())
    }

    /// Returns the number of registered nodes.
    pub fn monitored_count(&self) -> usize {
        self.monitored.len()
    }

    /// Binds the UDP socket.
    pub async fn connect(&mut self) -> ForwardResult<()> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|source| ForwardError::Bind { source })?;

        info!(target = %self.settings.target, "UDP socket initialized");
        self.socket = Some(socket);
        Ok(())
    }

    /// Runs the poll loop until `stop` fires, then releases the socket.
    ///
    /// Each tick runs to completion before the next is scheduled; an
    /// unexpected tick error is logged and retried after a short backoff
    /// rather than terminating the loop.
    pub async fn run(mut self, mut stop: broadcast::Receiver<()>) -> ForwardResult<()> {
        if self.socket.is_none() {
            return Err(ForwardError::NotConnected);
        }

        info!(
            nodes = self.monitored.len(),
            interval_ms = self.settings.interval.as_millis() as u64,
            "Bridge started"
        );

        loop {
            let pause = match self.tick().await {
                Ok(emitted) => {
                    if emitted {
                        trace!("Snapshot emitted");
                    }
                    self.settings.interval
                }
                Err(e) => {
                    warn!(error = %e, "Tick failed, backing off");
                    ERROR_BACKOFF
                }
            };

            tokio::select! {
                _ = stop.recv() => break,
                _ = sleep(pause) => {}
            }
        }

        // Release the transport before returning.
        self.socket = None;
        info!("Bridge stopped");
        Ok(())
    }

    /// One poll tick: read, compare, and send when something changed.
    ///
    /// Returns `true` when a datagram was emitted.
    async fn tick(&mut self) -> ForwardResult<bool> {
        let mut entries: BTreeMap<String, NodeSnapshot> = BTreeMap::new();

        for node in &self.monitored {
            match self.client.read(&node.path).await {
                Ok(sample) => {
                    entries.insert(
                        node.alias.clone(),
                        NodeSnapshot::from_sample(&node.alias, sample),
                    );
                }
                Err(e) => {
                    // Absent from this snapshot; the tick goes on.
                    warn!(tag = %node.path, error = %e, "Skipping unreadable node");
                }
            }
        }

        let values: BTreeMap<String, Value> = entries
            .iter()
            .map(|(alias, snapshot)| (alias.clone(), snapshot.value.clone()))
            .collect();

        if values == self.last_values {
            return Ok(false);
        }

        let payload = ForwardPayload::now(entries);
        let bytes =
            serde_json::to_vec(&payload).map_err(|source| ForwardError::Payload { source })?;

        let socket = self.socket.as_ref().ok_or(ForwardError::NotConnected)?;
        socket
            .send_to(&bytes, self.settings.target)
            .await
            .map_err(|source| ForwardError::send(self.settings.target.to_string(), source))?;

        debug!(
            bytes = bytes.len(),
            nodes = payload.values.len(),
            "Sent snapshot"
        );
        self.last_values = values;
        Ok(true)
    }

    /// Receives one JSON message from the sink peer.
    ///
    /// The sink can send selection messages back over the same socket; the
    /// run path does not depend on this.
    pub async fn recv_json(&self) -> ForwardResult<serde_json::Value> {
        let socket = self.socket.as_ref().ok_or(ForwardError::NotConnected)?;

        let mut buf = [0u8; 1024];
        let (len, _peer) = socket
            .recv_from(&mut buf)
            .await
            .map_err(|source| ForwardError::Receive { source })?;

        serde_json::from_slice(&buf[..len]).map_err(|source| ForwardError::Payload { source })
    }
}

// =============================================================================
// Tests
// =============================================================================
