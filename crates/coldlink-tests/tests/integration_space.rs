// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Address-Space Integration Tests
//!
//! Exercises the provider contract through the client seam:
//!
//! - complete 13-leaf unit creation
//! - write-then-read visibility with monotonic timestamps
//! - insertion-ordered discovery
//! - `NotFound` vs `Unavailable` classification

use std::sync::Arc;

use coldlink_core::error::SpaceError;
use coldlink_core::tree::{SENSORS_PER_UNIT, SensorKind, Topology};
use coldlink_core::types::{TagPath, Value};
use coldlink_space::{AddressSpace, InMemoryClient, NodeKind, SpaceClient};

use coldlink_tests::common::{connected_client, small_topology};

#[tokio::test]
async fn test_every_unit_has_thirteen_leaves() {
    let topology = Topology::recovered_default();
    let space = AddressSpace::from_topology(&topology);

    for (site, location, unit) in topology.units() {
        let node = space
            .resolve_by_path(&[site.as_str(), location.as_str(), unit.id.as_str()])
            .unwrap();

        let children = space.children(node);
        assert_eq!(children.len(), SENSORS_PER_UNIT);
        assert!(
            children
                .iter()
                .all(|(_, child)| space.kind(*child) == NodeKind::Variable)
        );
    }
}

#[tokio::test]
async fn test_write_then_read_returns_value_and_fresh_timestamp() {
    let client = connected_client(&small_topology()).await;
    let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::EvapInPres);

    let before = chrono::Utc::now();
    client.write(&path, Value::Numeric(7.25)).await.unwrap();

    let sample = client.read(&path).await.unwrap();
    assert_eq!(sample.value, Value::Numeric(7.25));
    assert!(sample.timestamp >= before);
    assert!(sample.quality.is_good());
}

#[tokio::test]
async fn test_all_leaves_default_to_zero() {
    let client = connected_client(&small_topology()).await;

    for kind in SensorKind::ALL {
        let path = TagPath::new("Site1", "Location1", "Unit1", kind);
        let sample = client.read(&path).await.unwrap();
        assert_eq!(sample.value, Value::Numeric(0.0), "leaf {}", kind);
    }
}

#[tokio::test]
async fn test_browse_preserves_insertion_order() {
    let topology = Topology::recovered_default();
    let client = connected_client(&topology).await;

    // Unit children come back in SensorKind::ALL creation order.
    let names = client
        .browse(&["Site1", "Location1", "Unit1"])
        .await
        .unwrap();
    let expected: Vec<String> = SensorKind::ALL
        .iter()
        .map(|k| k.as_str().to_string())
        .collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_missing_paths_are_not_found_never_a_panic() {
    let client = connected_client(&small_topology()).await;

    for segments in [
        vec!["Site9"],
        vec!["Site1", "Location9"],
        vec!["Site1", "Location1", "Unit9"],
    ] {
        let err = client.browse(&segments).await.unwrap_err();
        assert!(err.is_not_found(), "{:?} should be NotFound", segments);
    }

    let path = TagPath::new("Site1", "Location9", "Unit1", SensorKind::TempC1);
    assert!(client.read(&path).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_disconnected_client_reports_unavailable() {
    let space = Arc::new(AddressSpace::from_topology(&small_topology()));
    let client = InMemoryClient::new(space);

    let err = client.browse(&[]).await.unwrap_err();
    assert!(matches!(err, SpaceError::Unavailable { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_writers_and_readers() {
    let client = connected_client(&small_topology()).await;
    let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::TempC1);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            for j in 0..50 {
                client
                    .write(&path, Value::Numeric((i * 100 + j) as f64))
                    .await
                    .unwrap();
            }
        }));
    }
    for _ in 0..4 {
        let client = client.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..50 {
                // Every observed sample is one that some writer produced
                // in full; never a torn value.
                let sample = client.read(&path).await.unwrap();
                assert!(sample.value.as_f64().is_some());
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }
}
