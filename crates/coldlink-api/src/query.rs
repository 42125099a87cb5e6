// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The lookup/query service layer.
//!
//! Stateless read operations over a [`SpaceClient`]. Discovery matches
//! browse names against the naming conventions and silently drops
//! non-conforming children; the unit snapshot tolerates per-leaf read
//! failures by logging and omitting the leaf.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use coldlink_core::error::SpaceResult;
use coldlink_core::tree::SensorKind;
use coldlink_core::types::{TagPath, Value};

use coldlink_space::SpaceClient;

static SITE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Site\d+$").expect("valid pattern"));
static LOCATION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Location\d+$").expect("valid pattern"));
static UNIT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Unit\d+$").expect("valid pattern"));

// =============================================================================
// Discovery
// =============================================================================

/// Lists sites: children of the root matching `Site<n>`.
///
/// Returns an empty mapping, not an error, when nothing matches.
pub async fn list_sites(client: &dyn SpaceClient) -> SpaceResult<BTreeMap<String, String>> {
    let children = client.browse(&[]).await?;
    Ok(filter_names(children, &SITE_NAME))
}

/// Lists locations under a site: children matching `Location<n>`.
///
/// Fails with `NotFound` when the site does not resolve.
pub async fn list_locations(
    client: &dyn SpaceClient,
    site: &str,
) -> SpaceResult<BTreeMap<String, String>> {
    let children = client.browse(&[site]).await?;
    Ok(filter_names(children, &LOCATION_NAME))
}

/// Lists units under a location: children matching `Unit<n>`.
///
/// Fails with `NotFound` on any unresolved segment.
pub async fn list_units(
    client: &dyn SpaceClient,
    site: &str,
    location: &str,
) -> SpaceResult<BTreeMap<String, String>> {
    let children = client.browse(&[site, location]).await?;
    Ok(filter_names(children, &UNIT_NAME))
}

fn filter_names(children: Vec<String>, pattern: &Regex) -> BTreeMap<String, String> {
    let matched: BTreeMap<String, String> = children
        .into_iter()
        .filter(|name| pattern.is_match(name))
        .map(|name| (name.clone(), name))
        .collect();

    if matched.is_empty() {
        debug!("No children matched {}", pattern.as_str());
    }
    matched
}

// =============================================================================
// Unit Snapshot
// =============================================================================

/// One leaf in a unit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafReading {
    /// Current value.
    pub value: Value,

    /// When the value was written.
    pub timestamp: DateTime<Utc>,
}

/// Reads the full sensor snapshot of one unit.
///
/// Resolving the unit itself can fail with `NotFound`/`Unavailable`; after
/// that, a failing leaf is logged and omitted rather than aborting the
/// snapshot.
pub async fn read_unit_snapshot(
    client: &dyn SpaceClient,
    site: &str,
    location: &str,
    unit: &str,
) -> SpaceResult<BTreeMap<String, LeafReading>> {
    // Resolve the unit first so path errors stay distinguishable from
    // per-leaf failures.
    client.browse(&[site, location, unit]).await?;

    let mut snapshot = BTreeMap::new();
    for kind in SensorKind::ALL {
        let path = TagPath::new(site, location, unit, kind);
        match client.read(&path).await {
            Ok(sample) => {
                snapshot.insert(
                    kind.as_str().to_string(),
                    LeafReading {
                        value: sample.value,
                        timestamp: sample.timestamp,
                    },
                );
            }
            Err(e) => {
                warn!(tag = %path, error = %e, "Skipping unreadable leaf");
            }
        }
    }

    Ok(snapshot)
}

// =============================================================================
// Tests
// =============================================================================
