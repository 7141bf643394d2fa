// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ippspool")]
#[command(about = "Find, decode and summarise CUPS job control files")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Collect control files found below <ROOT>
    Find {
        root: PathBuf,

        /// Control directory to copy into
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Decode a file or every file below a directory
    Decode {
        path: PathBuf,

        /// Results directory for the per-file tables
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Write JSON tables instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Print one decoded file as JSON
    Dump { file: PathBuf },
}
