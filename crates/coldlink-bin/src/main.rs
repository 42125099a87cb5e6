// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! COLDLINK gateway entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use coldlink_bin::cli::{Cli, Commands, RunArgs};
use coldlink_bin::commands;
use coldlink_bin::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Run(RunArgs::default()));

    let result = match command {
        Commands::Run(args) => commands::run::execute(&cli.config, &args).await,
        Commands::Validate => commands::validate::execute(&cli.config),
        Commands::Version => {
            commands::version::execute();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
