// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-core
//!
//! Core abstractions and shared types for the COLDLINK cold-chain telemetry
//! gateway.
//!
//! This crate provides the foundational types used across all COLDLINK
//! components:
//!
//! - **Types**: Identifiers (`SiteId`, `LocationId`, `UnitId`), the
//!   `Value` union, `TagSample`, and the typed `TagPath`
//! - **Tree**: The fixed tag-tree schema (`SensorKind`, `Topology`)
//! - **Error**: Unified error hierarchy
//! - **Shutdown**: Cooperative shutdown coordination shared by all loops
//!
//! ## Example
//!
//! ```rust
//! use coldlink_core::tree::SensorKind;
//! use coldlink_core::types::{TagPath, Value};
//!
//! let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::CompOutPres);
//! assert_eq!(path.to_string(), "Site1/Location1/Unit1/compOutPres");
//!
//! // The replay coercion policy: numeric first, text as fallback.
//! assert_eq!(Value::coerce("12.5"), Value::Numeric(12.5));
//! assert_eq!(Value::coerce("n/a"), Value::Text("n/a".to_string()));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod shutdown;
pub mod tree;
pub mod types;

pub use error::{ColdlinkError, ColdlinkResult, ForwardError, ReplayError, SpaceError};
pub use shutdown::{ShutdownCoordinator, ShutdownToken};
pub use tree::{LocationSpec, SensorKind, SiteSpec, Topology, UnitSpec, SENSORS_PER_UNIT};
pub use types::{LocationId, SiteId, TagPath, TagQuality, TagSample, UnitId, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
