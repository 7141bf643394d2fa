// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Copies catalogued control files into `<control_dir>/<issue>/<name>_<nn>`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use ippspool_core::error::IppspoolError;

use crate::catalog::CatalogEntry;

/// Outcome of a collection run.
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Destination paths written.
    pub copied: Vec<PathBuf>,
    /// Sources that could not be copied.
    pub failed: Vec<(PathBuf, IppspoolError)>,
}

/// Destination of `entry` below `control_dir`.
pub fn destination(control_dir: &Path, entry: &CatalogEntry) -> PathBuf {
    control_dir.join(&entry.issue).join(entry.collected_name())
}

/// Copy every entry, continuing past individual failures.
#[instrument(skip_all, fields(control_dir = %control_dir.display(), files = entries.len()))]
pub fn collect(entries: &[CatalogEntry], control_dir: &Path) -> CollectReport {
    let mut report = CollectReport::default();
    for entry in entries {
        let dest = destination(control_dir, entry);
        match copy_one(&entry.path, &dest) {
            Ok(()) => report.copied.push(dest),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "copy failed");
                report.failed.push((entry.path.clone(), e));
            }
        }
    }
    info!(
        copied = report.copied.len(),
        failed = report.failed.len(),
        "control files collected"
    );
    report
}

fn copy_one(src: &Path, dest: &Path) -> Result<(), IppspoolError> {
    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::copy(src, dest)?;
    Ok(())
}
