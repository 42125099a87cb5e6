// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared fixtures for integration tests.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use coldlink_core::tree::{LocationSpec, SENSORS_PER_UNIT, SiteSpec, Topology, UnitSpec};
use coldlink_core::types::{LocationId, SiteId};
use coldlink_space::{AddressSpace, InMemoryClient, SpaceClient};

/// A one-site, one-location, one-unit topology replaying from row 0.
pub fn small_topology() -> Topology {
    Topology {
        sites: vec![SiteSpec {
            id: SiteId::new("Site1"),
            locations: vec![LocationSpec {
                id: LocationId::new("Location1"),
                units: vec![UnitSpec::new("Unit1", 0)],
            }],
        }],
    }
}

/// Builds dataset content with `rows` rows; cell `(row, col)` holds
/// `row * 100 + col` as a float.
pub fn dataset_content(rows: usize) -> String {
    let mut content = String::new();
    for row in 0..rows {
        let line: Vec<String> = (0..SENSORS_PER_UNIT)
            .map(|col| format!("{}.0", row * 100 + col))
            .collect();
        content.push_str(&line.join(","));
        content.push('\n');
    }
    content
}

/// Writes a dataset file into the temp directory and returns its path.
pub fn write_dataset(dir: &tempfile::TempDir, rows: usize) -> PathBuf {
    let path = dir.path().join("Dataset.csv");
    let mut file = std::fs::File::create(&path).expect("create dataset file");
    write!(file, "{}", dataset_content(rows)).expect("write dataset file");
    path
}

/// Builds and connects an in-memory client over the given topology.
pub async fn connected_client(topology: &Topology) -> Arc<InMemoryClient> {
    let space = Arc::new(AddressSpace::from_topology(topology));
    let client = Arc::new(InMemoryClient::new(space));
    client.connect().await.expect("connect in-memory client");
    client
}
