// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `find`, `decode` and `dump` commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use ippspool_core::AppConfig;
use ippspool_core::error::Result;
use ippspool_decode::Decoder;
use ippspool_scan::collect::destination;
use ippspool_scan::{
    Census, Discovery, catalog, collect, decode_batch, decode_file, input_files, save_table, write_json,
};

/// What a command left undone.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Files that could not be copied or decoded.
    pub failed: usize,
}

/// Find control files below `root` and copy them into the control dir.
pub fn find(
    config: &AppConfig,
    root: &Path,
    out: Option<PathBuf>,
    w: &mut impl Write,
) -> Result<Outcome> {
    let control_dir = out.unwrap_or_else(|| config.control_dir.clone());
    let discovery = Discovery::new(&config.scan)?;
    let found = discovery.find(root)?;
    let entries = catalog(&found)?;
    let report = collect(&entries, &control_dir);

    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            w,
            "{i:4}: {:6} {} -> {}",
            entry.len,
            entry.path.display(),
            destination(&control_dir, entry).display()
        )?;
    }
    for (path, e) in &report.failed {
        writeln!(w, "copy failed: {}: {e}", path.display())?;
    }
    writeln!(
        w,
        "{} found, {} unique, {} copied to {}",
        found.len(),
        entries.len(),
        report.copied.len(),
        control_dir.display()
    )?;
    Ok(Outcome {
        failed: report.failed.len(),
    })
}

/// Decode every file at `path`, write one table per file and print the
/// failures and the value census.
pub fn decode(
    config: &AppConfig,
    path: &Path,
    out: Option<PathBuf>,
    json: bool,
    w: &mut impl Write,
) -> Result<Outcome> {
    let results_dir = out.unwrap_or_else(|| config.results_dir.clone());
    let decoder = Decoder::new(config.decoder.clone());
    let files = input_files(path)?;
    let report = decode_batch(&decoder, &files, config.scan.workers);

    let mut census = Census::new();
    let mut failed = report.failures.len();
    for (input, message) in &report.decoded {
        census.add(message);
        match save_table(&results_dir, input, message, json) {
            Ok(table) => writeln!(w, "{} -> {}", input.display(), table.display())?,
            Err(e) => {
                writeln!(w, "write failed: {}: {e}", input.display())?;
                failed += 1;
            }
        }
    }

    if !report.failures.is_empty() {
        writeln!(w, "\nbad files:")?;
        for (input, e) in &report.failures {
            writeln!(w, "  {}: {e}", input.display())?;
        }
    }

    let summary = census.report();
    if !summary.is_empty() {
        writeln!(w, "\nvalue census:")?;
        for (name, values) in summary {
            writeln!(w, "  {name}: {}", values.join(", "))?;
        }
    }

    info!(
        files = files.len(),
        decoded = report.decoded.len(),
        failed,
        "decode finished"
    );
    Ok(Outcome { failed })
}

/// Decode one file and print its tree as JSON.
pub fn dump(config: &AppConfig, file: &Path, w: &mut impl Write) -> Result<Outcome> {
    let decoder = Decoder::new(config.decoder.clone());
    let message = decode_file(&decoder, file)?;
    write_json(&message, w)?;
    Ok(Outcome::default())
}
