// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `run` command: start the gateway.

use std::path::Path;

use coldlink_config::load_config;

use crate::cli::RunArgs;
use crate::error::{BinError, BinResult};
use crate::runtime::SimulatorRuntime;

/// Loads the configuration and runs the gateway until shutdown.
pub async fn execute(config_path: &Path, args: &RunArgs) -> BinResult<()> {
    let config = load_config(config_path).map_err(|e| BinError::Configuration(e.to_string()))?;

    SimulatorRuntime::new(config)
        .with_replay(!args.no_replay)
        .with_forwarder(!args.no_forwarder)
        .run()
        .await
}
