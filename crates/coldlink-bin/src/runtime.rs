// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Gateway runtime orchestration.
//!
//! Startup order:
//!
//! 1. Materialize the address space from the configured topology
//! 2. Connect the in-memory client all components share
//! 3. Load the dataset and spawn the replay tasks
//! 4. Register, connect, and start the UDP forwarder
//! 5. Start the REST façade
//! 6. Wait for a shutdown signal, then stop everything cooperatively
//!
//! A connect/bind failure during startup aborts only the owning component
//! (and therefore the process before it is ready); once running, replay
//! and forwarder failures are contained and logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use coldlink_api::{ApiServer, ApiSettings, AppState};
use coldlink_config::ColdlinkConfig;
use coldlink_core::shutdown::ShutdownCoordinator;
use coldlink_forward::{BridgeSettings, UdpBridge};
use coldlink_replay::{Dataset, ReplayDriver};
use coldlink_space::{AddressSpace, InMemoryClient, SpaceClient};

use crate::error::{BinError, BinResult};

// =============================================================================
// SimulatorRuntime
// =============================================================================

/// Orchestrates all gateway components for one process lifetime.
pub struct SimulatorRuntime {
    config: ColdlinkConfig,
    shutdown: ShutdownCoordinator,
    replay_enabled: bool,
    forwarder_enabled: bool,
}

impl SimulatorRuntime {
    /// Creates a runtime from a validated configuration.
    pub fn new(config: ColdlinkConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownCoordinator::new(),
            replay_enabled: true,
            forwarder_enabled: true,
        }
    }

    /// Enables or disables the replay tasks.
    pub fn with_replay(mut self, enabled: bool) -> Self {
        self.replay_enabled = enabled;
        self
    }

    /// Enables or disables the UDP forwarder.
    pub fn with_forwarder(mut self, enabled: bool) -> Self {
        self.forwarder_enabled = enabled;
        self
    }

    /// Returns the shutdown coordinator (used by tests to stop the run).
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Runs the gateway until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting COLDLINK gateway v{}", coldlink_core::VERSION);

        // 1-2. Address space + shared client.
        let space = Arc::new(AddressSpace::from_topology(&self.config.simulator.topology));
        info!(
            nodes = space.node_count(),
            units = self.config.simulator.topology.unit_count(),
            "Address space materialized"
        );

        let in_memory = Arc::new(InMemoryClient::new(space).with_name("gateway"));
        in_memory
            .connect()
            .await
            .map_err(|e| BinError::Initialization(format!("Client connect failed: {}", e)))?;
        let client: Arc<dyn SpaceClient> = in_memory.clone();

        // 3. Replay tasks.
        let replay_handles = if self.replay_enabled {
            self.start_replay(client.clone())?
        } else {
            info!("Replay disabled");
            Vec::new()
        };

        // 4. UDP forwarder.
        let forward_handle = if self.forwarder_enabled && self.config.forwarder.enabled {
            Some(self.start_forwarder(client.clone()).await?)
        } else {
            info!("Forwarder disabled");
            None
        };

        // 5. REST façade.
        let settings = ApiSettings {
            addr: self.config.api.socket_addr(),
            request_timeout: self.config.api.request_timeout(),
            cors_allow_any: self.config.api.cors_allow_any,
        };
        let server = ApiServer::new(AppState::new(client.clone()), settings);
        let addr = server.addr();

        let mut api_stop = self.shutdown.subscribe();
        let mut api_handle = tokio::spawn(async move {
            server
                .run_with_shutdown(async move {
                    let _ = api_stop.recv().await;
                })
                .await
        });

        info!("COLDLINK gateway is ready (API: {})", addr);

        // 6. Wait for a signal, or for the API server to die on its own
        // (e.g. the bind failed).
        let premature = tokio::select! {
            _ = self.shutdown.wait_for_signal() => None,
            joined = &mut api_handle => Some(joined),
        };
        self.shutdown.initiate();

        info!("Shutdown initiated, cleaning up...");

        for handle in replay_handles {
            let _ = handle.await;
        }
        if let Some(handle) = forward_handle {
            let _ = handle.await;
        }

        let api_result = match premature {
            Some(joined) => joined,
            None => (&mut api_handle).await,
        };

        if let Err(e) = in_memory.disconnect().await {
            error!(error = %e, "Client disconnect failed");
        }

        match api_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(BinError::Runtime(format!("API server failed: {}", e))),
            Err(e) => return Err(BinError::Runtime(format!("API task panicked: {}", e))),
        }

        info!("COLDLINK gateway shutdown complete");
        Ok(())
    }

    fn start_replay(&self, client: Arc<dyn SpaceClient>) -> BinResult<Vec<JoinHandle<()>>> {
        let dataset = Dataset::load(&self.config.simulator.dataset)
            .map_err(|e| BinError::Initialization(format!("Dataset load failed: {}", e)))?;
        info!(
            path = %self.config.simulator.dataset.display(),
            rows = dataset.row_count(),
            "Dataset loaded"
        );

        let assignments =
            ReplayDriver::assignments(&dataset, &self.config.simulator.topology)
                .map_err(|e| BinError::Initialization(format!("Replay setup failed: {}", e)))?;

        let driver = ReplayDriver::new(client);
        Ok(driver.spawn_all(assignments, self.shutdown.token()))
    }

    async fn start_forwarder(&self, client: Arc<dyn SpaceClient>) -> BinResult<JoinHandle<()>> {
        let target = self
            .config
            .forwarder
            .target_addr()
            .map_err(|e| BinError::Configuration(e.to_string()))?;

        let mut bridge = UdpBridge::new(
            client,
            BridgeSettings {
                target,
                interval: self.config.forwarder.interval(),
            },
        );

        for (path, alias) in self
            .config
            .forwarder
            .effective_registrations(&self.config.simulator.topology)
        {
            bridge
                .register(path, alias)
                .await
                .map_err(|e| BinError::Initialization(format!("Registration failed: {}", e)))?;
        }

        bridge
            .connect()
            .await
            .map_err(|e| BinError::Initialization(format!("Forwarder connect failed: {}", e)))?;

        let stop = self.shutdown.subscribe();
        Ok(tokio::spawn(async move {
            if let Err(e) = bridge.run(stop).await {
                error!(error = %e, "Forwarder stopped with error");
            }
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use coldlink_core::tree::SENSORS_PER_UNIT;

    fn test_config(dir: &tempfile::TempDir) -> ColdlinkConfig {
        let dataset_path = dir.path().join("Dataset.csv");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        for row in 0..400 {
            let line: Vec<String> = (0..SENSORS_PER_UNIT)
                .map(|col| format!("{}.5", row * 10 + col))
                .collect();
            writeln!(file, "{}", line.join(",")).unwrap();
        }

        let mut config = ColdlinkConfig::default();
        config.simulator.dataset = dataset_path;
        // Port 0 lets the OS pick a free port; the forwarder sink is a
        // black hole on localhost.
        config.api.port = 0;
        config.validate().unwrap();
        config
    }

    #[tokio::test]
    async fn test_runtime_starts_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = SimulatorRuntime::new(test_config(&dir));
        let shutdown = runtime.shutdown_handle();

        let run = tokio::spawn(runtime.run());

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.initiate();

        let result = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("runtime should stop on shutdown")
            .unwrap();
        assert!(result.is_ok(), "runtime failed: {:?}", result);
    }

    #[tokio::test]
    async fn test_runtime_fails_on_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.simulator.dataset = dir.path().join("missing.csv");

        let result = SimulatorRuntime::new(config).run().await;
        assert!(matches!(result, Err(BinError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_runtime_without_replay_or_forwarder() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = SimulatorRuntime::new(test_config(&dir))
            .with_replay(false)
            .with_forwarder(false);
        let shutdown = runtime.shutdown_handle();

        let run = tokio::spawn(runtime.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.initiate();

        let result = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("runtime should stop on shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}
