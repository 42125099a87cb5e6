// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `validate` command: check the configuration without starting.

use std::path::Path;

use coldlink_config::load_config;
use coldlink_core::tree::SENSORS_PER_UNIT;

use crate::error::{BinError, BinResult};

/// Loads and validates the configuration, printing a short summary.
pub fn execute(config_path: &Path) -> BinResult<()> {
    let config = load_config(config_path).map_err(|e| BinError::Configuration(e.to_string()))?;

    let topology = &config.simulator.topology;
    let units = topology.unit_count();

    println!("Configuration OK: {}", config_path.display());
    println!("  sites:        {}", topology.sites.len());
    println!("  units:        {}", units);
    println!("  replay tasks: {}", units * SENSORS_PER_UNIT);
    println!("  api:          {}", config.api.socket_addr());
    println!(
        "  forwarder:    {} ({})",
        if config.forwarder.enabled { "enabled" } else { "disabled" },
        config.forwarder.target
    );

    Ok(())
}
