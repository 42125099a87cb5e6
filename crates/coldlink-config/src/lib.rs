// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-config
//!
//! Configuration schema, loading, and validation for COLDLINK.
//!
//! Configuration files may be YAML, TOML, or JSON; the format is chosen by
//! file extension. Every loaded configuration passes a validation step that
//! checks identifier naming conventions, duplicate ids, and interval
//! bounds before any component starts.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, load_config};
pub use schema::{
    ApiConfig, ColdlinkConfig, ForwarderConfig, LoggingConfig, RegistrationConfig, SimulatorConfig,
};
