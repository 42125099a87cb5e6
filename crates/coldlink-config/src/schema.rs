// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for COLDLINK.
//!
//! # Schema Structure
//!
//! ```text
//! ColdlinkConfig
//! ├── simulator: SimulatorConfig   (dataset path + tag-tree topology)
//! ├── api: ApiConfig               (REST façade)
//! ├── forwarder: ForwarderConfig   (UDP bridge)
//! └── logging: LoggingConfig
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use coldlink_core::tree::{SensorKind, Topology};
use coldlink_core::types::TagPath;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default REST façade port.
pub const DEFAULT_API_PORT: u16 = 8000;

/// Default UDP sink target.
pub const DEFAULT_FORWARD_TARGET: &str = "127.0.0.1:12345";

/// Default forwarder poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Minimum forwarder poll interval in milliseconds.
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Maximum forwarder poll interval in milliseconds (1 hour).
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// Default API request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

static SITE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Site\d+$").expect("valid pattern"));
static LOCATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Location\d+$").expect("valid pattern"));
static UNIT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Unit\d+$").expect("valid pattern"));

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for COLDLINK.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ColdlinkConfig {
    /// Simulator configuration (dataset + topology).
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// REST façade configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// UDP forwarder configuration.
    #[serde(default)]
    pub forwarder: ForwarderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ColdlinkConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.simulator.validate()?;
        self.api.validate()?;
        self.forwarder.validate(&self.simulator.topology)?;
        self.logging.validate()?;
        Ok(())
    }
}

// =============================================================================
// Simulator Configuration
// =============================================================================

/// Dataset source and tag-tree topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Path to the comma-separated dataset.
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,

    /// The object-node layout to materialize.
    #[serde(default)]
    pub topology: Topology,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("Dataset.csv")
}

impl SimulatorConfig {
    /// Validates naming conventions and uniqueness across the topology.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut site_ids = HashSet::new();
        for site in &self.topology.sites {
            if !SITE_ID.is_match(site.id.as_str()) {
                return Err(ConfigError::validation(
                    "simulator.topology",
                    format!("site id '{}' does not match Site<n>", site.id),
                ));
            }
            if !site_ids.insert(site.id.as_str()) {
                return Err(ConfigError::duplicate_id(site.id.as_str(), "topology"));
            }

            let mut location_ids = HashSet::new();
            for location in &site.locations {
                if !LOCATION_ID.is_match(location.id.as_str()) {
                    return Err(ConfigError::validation(
                        "simulator.topology",
                        format!("location id '{}' does not match Location<n>", location.id),
                    ));
                }
                if !location_ids.insert(location.id.as_str()) {
                    return Err(ConfigError::duplicate_id(
                        location.id.as_str(),
                        site.id.as_str(),
                    ));
                }

                let mut unit_ids = HashSet::new();
                for unit in &location.units {
                    if !UNIT_ID.is_match(unit.id.as_str()) {
                        return Err(ConfigError::validation(
                            "simulator.topology",
                            format!("unit id '{}' does not match Unit<n>", unit.id),
                        ));
                    }
                    if !unit_ids.insert(unit.id.as_str()) {
                        return Err(ConfigError::duplicate_id(
                            unit.id.as_str(),
                            format!("{}/{}", site.id, location.id),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset_path(),
            topology: Topology::default(),
        }
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// REST façade settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Whether to allow any CORS origin. The original front end is served
    /// from a different origin, so this defaults to on.
    #[serde(default = "default_true")]
    pub cors_allow_any: bool,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl ApiConfig {
    /// Returns the socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validates the API settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "api.request_timeout_ms",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
            request_timeout_ms: default_request_timeout_ms(),
            cors_allow_any: true,
        }
    }
}

// =============================================================================
// Forwarder Configuration
// =============================================================================

/// UDP forwarder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForwarderConfig {
    /// Whether the forwarder runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Sink address (`host:port`).
    #[serde(default = "default_forward_target")]
    pub target: String,

    /// Poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,

    /// Monitored leaves. Empty means every leaf in the topology, with
    /// default aliases.
    #[serde(default)]
    pub registrations: Vec<RegistrationConfig>,
}

fn default_forward_target() -> String {
    DEFAULT_FORWARD_TARGET.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl ForwarderConfig {
    /// Returns the poll interval.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Parses the sink address.
    pub fn target_addr(&self) -> ConfigResult<SocketAddr> {
        self.target.parse().map_err(|_| {
            ConfigError::validation(
                "forwarder.target",
                format!("'{}' is not a valid host:port address", self.target),
            )
        })
    }

    /// Returns the effective `(path, alias)` registrations.
    ///
    /// When no explicit registrations are configured, every leaf of the
    /// topology is monitored under its default alias.
    pub fn effective_registrations(&self, topology: &Topology) -> Vec<(TagPath, String)> {
        if self.registrations.is_empty() {
            topology
                .leaves()
                .map(|(path, _)| {
                    let alias = path.default_alias();
                    (path, alias)
                })
                .collect()
        } else {
            self.registrations
                .iter()
                .map(|registration| {
                    let path = registration.tag_path();
                    let alias = registration
                        .alias
                        .clone()
                        .unwrap_or_else(|| path.default_alias());
                    (path, alias)
                })
                .collect()
        }
    }

    /// Validates the forwarder settings against the topology.
    pub fn validate(&self, topology: &Topology) -> ConfigResult<()> {
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&self.interval_ms) {
            return Err(ConfigError::validation(
                "forwarder.interval_ms",
                format!(
                    "must be between {} and {}",
                    MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS
                ),
            ));
        }

        self.target_addr()?;

        let known: HashSet<String> = topology
            .units()
            .map(|(site, location, unit)| format!("{}/{}/{}", site, location, unit.id))
            .collect();

        for registration in &self.registrations {
            let unit_path = format!(
                "{}/{}/{}",
                registration.site, registration.location, registration.unit
            );
            if !known.contains(&unit_path) {
                return Err(ConfigError::validation(
                    "forwarder.registrations",
                    format!("'{}' is not part of the topology", unit_path),
                ));
            }
        }

        Ok(())
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: default_forward_target(),
            interval_ms: default_poll_interval_ms(),
            registrations: Vec::new(),
        }
    }
}

/// One monitored leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationConfig {
    /// Site identifier.
    pub site: String,

    /// Location identifier.
    pub location: String,

    /// Unit identifier.
    pub unit: String,

    /// Sensor leaf.
    pub sensor: SensorKind,

    /// Alias used in the forwarded payload. Defaults to a compact
    /// `sensor_S<n>L<n>U<n>` form.
    #[serde(default)]
    pub alias: Option<String>,
}

impl RegistrationConfig {
    /// Returns the typed tag path of this registration.
    pub fn tag_path(&self) -> TagPath {
        TagPath::new(
            self.site.as_str(),
            self.location.as_str(),
            self.unit.as_str(),
            self.sensor,
        )
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format (text, json, compact).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl LoggingConfig {
    /// Validates the logging settings.
    pub fn validate(&self) -> ConfigResult<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        const FORMATS: [&str; 3] = ["text", "json", "compact"];

        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logging.level",
                format!("'{}' is not a known level", self.level),
            ));
        }
        if !FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logging.format",
                format!("'{}' is not a known format", self.format),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
