// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
use cli::{commands, display, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    docsift::logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", display::error_line("error:"), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Index { args } => commands::run_index(&args),
        Commands::Watch { args, debounce_ms } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(commands::run_watch(&args, Duration::from_millis(debounce_ms)))
        }
        Commands::Search { file, query, limit } => commands::run_search(&file, &query, limit),
        Commands::Inspect { file } => commands::run_inspect(&file),
    }
}
