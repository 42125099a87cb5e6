// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The tag-tree schema.
//!
//! COLDLINK models a fixed 4-level hierarchy: Site → Location → Unit →
//! Sensor. Every unit carries the same 13 sensor leaves, so the whole tree
//! is described by pure data: the [`SensorKind`] enumeration plus a
//! [`Topology`] listing the object nodes. All per-unit wiring elsewhere in
//! the workspace is driven by iterating this schema rather than naming
//! sensors by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{LocationId, SiteId, TagPath, UnitId};

/// Number of sensor leaves on every unit.
pub const SENSORS_PER_UNIT: usize = 13;

// =============================================================================
// SensorKind
// =============================================================================

/// The sensor leaves carried by every refrigeration unit.
///
/// Variant order matches the dataset column order; [`SensorKind::column`]
/// relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    /// Compressor outlet pressure.
    CompOutPres,
    /// Compressor outlet temperature.
    CompOutTemp,
    /// Condenser inlet pressure.
    CondInPres,
    /// Condenser inlet temperature.
    CondInTemp,
    /// Condenser outlet pressure.
    CondOutPres,
    /// Condenser outlet temperature.
    CondOutTemp,
    /// Evaporator inlet pressure.
    EvapInPres,
    /// Compressor inlet temperature.
    CompInTemp,
    /// Evaporator outlet pressure.
    EvapOutPres,
    /// Evaporator outlet temperature.
    EvapOutTemp,
    /// Chamber temperature 1.
    TempC1,
    /// Chamber temperature 2.
    TempC2,
    /// Chamber temperature 3.
    TempC3,
}

impl SensorKind {
    /// All sensor kinds, in dataset column order.
    pub const ALL: [SensorKind; SENSORS_PER_UNIT] = [
        SensorKind::CompOutPres,
        SensorKind::CompOutTemp,
        SensorKind::CondInPres,
        SensorKind::CondInTemp,
        SensorKind::CondOutPres,
        SensorKind::CondOutTemp,
        SensorKind::EvapInPres,
        SensorKind::CompInTemp,
        SensorKind::EvapOutPres,
        SensorKind::EvapOutTemp,
        SensorKind::TempC1,
        SensorKind::TempC2,
        SensorKind::TempC3,
    ];

    /// Returns the leaf browse name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::CompOutPres => "compOutPres",
            SensorKind::CompOutTemp => "compOutTemp",
            SensorKind::CondInPres => "condInPres",
            SensorKind::CondInTemp => "condInTemp",
            SensorKind::CondOutPres => "condOutPres",
            SensorKind::CondOutTemp => "condOutTemp",
            SensorKind::EvapInPres => "evapInPres",
            SensorKind::CompInTemp => "compInTemp",
            SensorKind::EvapOutPres => "evapOutPres",
            SensorKind::EvapOutTemp => "evapOutTemp",
            SensorKind::TempC1 => "tempC1",
            SensorKind::TempC2 => "tempC2",
            SensorKind::TempC3 => "tempC3",
        }
    }

    /// Returns the dataset column index for this sensor.
    pub fn column(&self) -> usize {
        Self::ALL
            .iter()
            .position(|k| k == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = UnknownSensor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownSensor(s.to_string()))
    }
}

/// Error returned when a sensor name does not match any [`SensorKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sensor kind: {0}")]
pub struct UnknownSensor(pub String);

// =============================================================================
// Topology
// =============================================================================

/// A refrigeration unit and the dataset row its replay starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Unit identifier (`Unit1`, ...).
    pub id: UnitId,

    /// First dataset row replayed into this unit's sensors.
    #[serde(default)]
    pub start_row: usize,
}

impl UnitSpec {
    /// Creates a unit spec.
    pub fn new(id: impl Into<UnitId>, start_row: usize) -> Self {
        Self {
            id: id.into(),
            start_row,
        }
    }
}

/// A location and the units it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Location identifier (`Location1`, ...).
    pub id: LocationId,

    /// Units under this location, in display order.
    pub units: Vec<UnitSpec>,
}

/// A site and the locations it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSpec {
    /// Site identifier (`Site1`, ...).
    pub id: SiteId,

    /// Locations under this site.
    pub locations: Vec<LocationSpec>,
}

/// The full object-node layout of the address space.
///
/// The sensor leaves are implied: every unit gets the complete
/// [`SensorKind::ALL`] set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    /// Sites, in display order.
    pub sites: Vec<SiteSpec>,
}

impl Topology {
    /// Creates an empty topology.
    pub fn new() -> Self {
        Self { sites: Vec::new() }
    }

    /// The layout shipped with the simulator: two sites, three locations,
    /// four units with staggered replay start rows.
    pub fn recovered_default() -> Self {
        Self {
            sites: vec![
                SiteSpec {
                    id: SiteId::new("Site1"),
                    locations: vec![
                        LocationSpec {
                            id: LocationId::new("Location1"),
                            units: vec![UnitSpec::new("Unit1", 0), UnitSpec::new("Unit2", 100)],
                        },
                        LocationSpec {
                            id: LocationId::new("Location2"),
                            units: vec![UnitSpec::new("Unit1", 200)],
                        },
                    ],
                },
                SiteSpec {
                    id: SiteId::new("Site2"),
                    locations: vec![LocationSpec {
                        id: LocationId::new("Location1"),
                        units: vec![UnitSpec::new("Unit1", 300)],
                    }],
                },
            ],
        }
    }

    /// Iterates every unit as `(site, location, unit spec)`.
    pub fn units(&self) -> impl Iterator<Item = (&SiteId, &LocationId, &UnitSpec)> {
        self.sites.iter().flat_map(|site| {
            site.locations.iter().flat_map(move |location| {
                location
                    .units
                    .iter()
                    .map(move |unit| (&site.id, &location.id, unit))
            })
        })
    }

    /// Iterates every sensor leaf as `(tag path, unit start row)`.
    pub fn leaves(&self) -> impl Iterator<Item = (TagPath, usize)> + '_ {
        self.units().flat_map(|(site, location, unit)| {
            SensorKind::ALL.iter().map(move |kind| {
                (
                    TagPath::new(site.clone(), location.clone(), unit.id.clone(), *kind),
                    unit.start_row,
                )
            })
        })
    }

    /// Returns the total number of units.
    pub fn unit_count(&self) -> usize {
        self.units().count()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::recovered_default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_kind_count() {
        assert_eq!(SensorKind::ALL.len(), SENSORS_PER_UNIT);
    }

    #[test]
    fn test_sensor_kind_columns_match_order() {
        assert_eq!(SensorKind::CompOutPres.column(), 0);
        assert_eq!(SensorKind::CompInTemp.column(), 7);
        assert_eq!(SensorKind::TempC3.column(), 12);
    }

    #[test]
    fn test_sensor_kind_roundtrip() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.as_str().parse::<SensorKind>().unwrap(), kind);
        }
        assert!("doorStatus".parse::<SensorKind>().is_err());
    }

    #[test]
    fn test_sensor_kind_serde_names() {
        let json = serde_json::to_string(&SensorKind::CondOutTemp).unwrap();
        assert_eq!(json, "\"condOutTemp\"");

        let kind: SensorKind = serde_json::from_str("\"tempC2\"").unwrap();
        assert_eq!(kind, SensorKind::TempC2);
    }

    #[test]
    fn test_recovered_default_topology() {
        let topology = Topology::recovered_default();
        assert_eq!(topology.sites.len(), 2);
        assert_eq!(topology.unit_count(), 4);

        let start_rows: Vec<usize> = topology.units().map(|(_, _, u)| u.start_row).collect();
        assert_eq!(start_rows, vec![0, 100, 200, 300]);
    }

    #[test]
    fn test_leaves_enumeration() {
        let topology = Topology::recovered_default();
        let leaves: Vec<_> = topology.leaves().collect();
        assert_eq!(leaves.len(), 4 * SENSORS_PER_UNIT);

        let (first, row) = &leaves[0];
        assert_eq!(first.to_string(), "Site1/Location1/Unit1/compOutPres");
        assert_eq!(*row, 0);
    }
}
