// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The replay driver.
//!
//! One task per `(unit, sensor)` pair, derived from the topology instead of
//! hand-wired per sensor. Tasks own their ring and share nothing with each
//! other; the only shared state is the address space behind the client
//! handle.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use coldlink_core::error::{ReplayError, ReplayResult};
use coldlink_core::shutdown::ShutdownToken;
use coldlink_core::tree::Topology;
use coldlink_core::types::TagPath;

use coldlink_space::SpaceClient;

use crate::dataset::{Dataset, ReplaySequence};

// =============================================================================
// ReplayDriver
// =============================================================================

/// Spawns and owns the replay task fleet.
pub struct ReplayDriver {
    client: Arc<dyn SpaceClient>,
}

impl ReplayDriver {
    /// Creates a driver writing through the given client.
    pub fn new(client: Arc<dyn SpaceClient>) -> Self {
        Self { client }
    }

    /// Builds the `(leaf, ring)` assignment list for a topology.
    ///
    /// Every unit gets one ring per sensor, sliced from the dataset at the
    /// unit's start row. Fails fast at startup if any ring would be empty.
    pub fn assignments(
        dataset: &Dataset,
        topology: &Topology,
    ) -> ReplayResult<Vec<(TagPath, ReplaySequence)>> {
        let mut assignments = Vec::new();
        for (path, start_row) in topology.leaves() {
            let sequence = dataset.sequence(path.sensor, start_row)?;
            assignments.push((path, sequence));
        }
        Ok(assignments)
    }

    /// Spawns one task per assignment. Returns the join handles.
    ///
    /// Each task stops cooperatively when `token` is triggered.
    pub fn spawn_all(
        &self,
        assignments: Vec<(TagPath, ReplaySequence)>,
        token: ShutdownToken,
    ) -> Vec<JoinHandle<()>> {
        info!(tasks = assignments.len(), "Starting replay tasks");

        assignments
            .into_iter()
            .map(|(path, sequence)| {
                let client = self.client.clone();
                let token = token.clone();
                tokio::spawn(replay_leaf(client, path, sequence, token))
            })
            .collect()
    }
}

// =============================================================================
// Replay Loop
// =============================================================================

/// The per-leaf replay loop: pop, coerce, write, rotate, repeat.
///
/// A write failure ends this task only; sibling tasks and the process keep
/// running.
async fn replay_leaf(
    client: Arc<dyn SpaceClient>,
    path: TagPath,
    mut sequence: ReplaySequence,
    token: ShutdownToken,
) {
    debug!(tag = %path, samples = sequence.len(), "Replay task started");

    loop {
        if token.is_stopped() {
            debug!(tag = %path, "Replay task stopped");
            return;
        }

        let value = sequence.next_value();
        match client.write(&path, value.clone()).await {
            Ok(()) => trace!(tag = %path, %value, "Replayed value"),
            Err(source) => {
                let err = ReplayError::write_failed(&path, source);
                error!(tag = %path, error = %err, "Replay task aborted");
                return;
            }
        }

        // The loop has no sleep; yield so sibling tasks make progress.
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use coldlink_core::shutdown::ShutdownCoordinator;
    use coldlink_core::tree::{SENSORS_PER_UNIT, SensorKind};
    use coldlink_core::types::Value;
    use coldlink_space::{AddressSpace, InMemoryClient};

    fn dataset(rows: usize) -> Dataset {
        let content: String = (0..rows)
            .map(|row| {
                (0..SENSORS_PER_UNIT)
                    .map(|col| format!("{}.0", row * 100 + col))
                    .collect::<Vec<_>>()
                    .join(",")
                    + "\n"
            })
            .collect();
        Dataset::parse(PathBuf::from("test.csv"), &content).unwrap()
    }

    async fn connected_client(topology: &Topology) -> Arc<InMemoryClient> {
        let space = Arc::new(AddressSpace::from_topology(topology));
        let client = Arc::new(InMemoryClient::new(space));
        client.connect().await.unwrap();
        client
    }

    #[test]
    fn test_assignments_cover_every_leaf() {
        let topology = Topology::recovered_default();
        let assignments = ReplayDriver::assignments(&dataset(400), &topology).unwrap();
        assert_eq!(assignments.len(), 4 * SENSORS_PER_UNIT);
    }

    #[test]
    fn test_assignments_fail_on_short_dataset() {
        // Unit start rows go up to 300; a 10-row dataset cannot cover them.
        let topology = Topology::recovered_default();
        let err = ReplayDriver::assignments(&dataset(10), &topology).unwrap_err();
        assert!(matches!(err, ReplayError::EmptySequence { .. }));
    }

    #[tokio::test]
    async fn test_replay_writes_and_stops() {
        let topology = Topology::recovered_default();
        let client = connected_client(&topology).await;
        let coordinator = ShutdownCoordinator::new();

        let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::CompOutPres);
        let sequence =
            ReplaySequence::from_samples("test", vec!["1.0".into(), "2.0".into()]).unwrap();

        let driver = ReplayDriver::new(client.clone());
        let handles = driver.spawn_all(vec![(path.clone(), sequence)], coordinator.token());

        // Let the loop spin a few iterations, then stop it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        coordinator.initiate();
        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("replay task should stop cooperatively")
                .unwrap();
        }

        let sample = client.read(&path).await.unwrap();
        assert!(
            sample.value == Value::Numeric(1.0) || sample.value == Value::Numeric(2.0),
            "leaf should hold a replayed ring value, got {}",
            sample.value
        );
    }

    #[tokio::test]
    async fn test_write_failure_ends_only_that_task() {
        let topology = Topology::recovered_default();
        let client = connected_client(&topology).await;
        let coordinator = ShutdownCoordinator::new();

        // One assignment targets a leaf that does not exist.
        let good = TagPath::new("Site1", "Location1", "Unit1", SensorKind::TempC1);
        let bad = TagPath::new("Site9", "Location1", "Unit1", SensorKind::TempC1);
        let sequence = ReplaySequence::from_samples("test", vec!["5.0".into()]).unwrap();

        let driver = ReplayDriver::new(client.clone());
        let handles = driver.spawn_all(
            vec![(bad, sequence.clone()), (good.clone(), sequence)],
            coordinator.token(),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;

        // The failing task has already returned on its own; the healthy one
        // is still replaying.
        assert!(handles[0].is_finished());
        assert!(!handles[1].is_finished());

        coordinator.initiate();
        for handle in handles {
            handle.await.unwrap();
        }

        let sample = client.read(&good).await.unwrap();
        assert_eq!(sample.value, Value::Numeric(5.0));
    }
}
