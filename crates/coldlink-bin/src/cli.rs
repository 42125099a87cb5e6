// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: start the gateway (default)
//! - `validate`: validate the configuration file
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// COLDLINK - cold-chain telemetry simulator and gateway.
///
/// Materializes a supermarket refrigeration tag tree, replays recorded
/// sensor data into it, and exposes the live values over REST and UDP.
#[derive(Parser, Debug)]
#[command(
    name = "coldlink",
    version = coldlink_core::VERSION,
    about = "Cold-chain telemetry simulator and gateway",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "coldlink.yaml",
        env = "COLDLINK_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "COLDLINK_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "COLDLINK_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for log aggregation.
    Json,
    /// Compact single-line output.
    Compact,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the gateway
    ///
    /// This is the default command when no subcommand is specified. It
    /// builds the address space, starts the replay tasks, the UDP
    /// forwarder, and the REST façade.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without starting anything.
    Validate,

    /// Show version information
    Version,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Do not start the replay tasks
    #[arg(long)]
    pub no_replay: bool,

    /// Do not start the UDP forwarder
    #[arg(long)]
    pub no_forwarder: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["coldlink"]);
        assert_eq!(cli.config, PathBuf::from("coldlink.yaml"));
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::parse_from(["coldlink", "run", "--no-forwarder"]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.no_forwarder);
                assert!(!args.no_replay);
            }
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["coldlink", "validate", "--config", "other.toml"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Some(Commands::Validate)));
    }
}
