// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content deduplication and numbering of discovered control files.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use ippspool_core::error::Result;

use crate::discovery::ControlFile;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// A control file with unique contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub issue: String,
    pub file_name: String,
    /// Position among unique files sharing this issue and file name.
    pub index: usize,
    pub sha256: String,
    pub len: usize,
}

impl CatalogEntry {
    /// `<file_name>_<nn>`, the name the file is collected under.
    pub fn collected_name(&self) -> String {
        format!("{}_{:02}", self.file_name, self.index)
    }
}

/// Read every file and keep the first occurrence of each distinct content.
#[instrument(skip_all, fields(files = files.len()))]
pub fn catalog(files: &[ControlFile]) -> Result<Vec<CatalogEntry>> {
    let mut seen = HashSet::new();
    let mut counters: HashMap<(&str, &str), usize> = HashMap::new();
    let mut entries = Vec::new();

    for file in files {
        let data = std::fs::read(&file.path)?;
        let sha256 = hash_bytes(&data);
        if !seen.insert(sha256.clone()) {
            debug!(path = %file.path.display(), %sha256, "duplicate contents, skipped");
            continue;
        }

        let counter = counters
            .entry((file.issue.as_str(), file.file_name.as_str()))
            .or_default();
        entries.push(CatalogEntry {
            path: file.path.clone(),
            issue: file.issue.clone(),
            file_name: file.file_name.clone(),
            index: *counter,
            sha256,
            len: data.len(),
        });
        *counter += 1;
    }

    if let (Some(min), Some(max)) = (
        entries.iter().map(|e| e.len).min(),
        entries.iter().map(|e| e.len).max(),
    ) {
        info!(unique = entries.len(), min, max, "control files catalogued");
    }
    Ok(entries)
}
