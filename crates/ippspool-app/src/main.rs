// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippspool: triage tool for CUPS job control files.
//
// Entry point. Initialises logging, loads configuration, and dispatches
// to the requested command.

mod cli;
mod commands;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use ippspool_core::AppConfig;
use ippspool_core::error::Result;

use cli::{Cli, Command};
use commands::Outcome;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Usage errors and --help exit here, with status 2 and 0.
    let cli = Cli::parse();

    match run(cli) {
        Ok(outcome) if outcome.failed == 0 => ExitCode::SUCCESS,
        Ok(outcome) => {
            tracing::warn!(failed = outcome.failed, "finished with failures");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "ippspool failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    tracing::debug!(?config, "configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = match cli.command {
        Command::Find { root, out: dir } => commands::find(&config, &root, dir, &mut out)?,
        Command::Decode { path, out: dir, json } => {
            commands::decode(&config, &path, dir, json, &mut out)?
        }
        Command::Dump { file } => commands::dump(&config, &file, &mut out)?,
    };
    out.flush()?;
    Ok(outcome)
}
