// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IppspoolError, Result};

/// Hard ceiling on `DecoderConfig::max_collection_depth`.  Collections are
/// parsed recursively, so the bound must stay well inside a default thread
/// stack.
pub const COLLECTION_DEPTH_CEILING: usize = 256;

/// Decoder limits and strictness switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Deepest collection nesting accepted before giving up.
    pub max_collection_depth: usize,
    /// Treat a buffer that ends without an end-of-attributes tag as truncated.
    pub require_end_of_attributes: bool,
    /// Reject out-of-band values that carry a payload instead of keeping
    /// them as `NonconformingOutOfBand` data.
    pub strict_out_of_band: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_collection_depth: 64,
            require_end_of_attributes: true,
            strict_out_of_band: false,
        }
    }
}

impl DecoderConfig {
    /// Reject settings the decoder cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_collection_depth > COLLECTION_DEPTH_CEILING {
            return Err(IppspoolError::Config(format!(
                "decoder.max_collection_depth {} exceeds the ceiling of {COLLECTION_DEPTH_CEILING}",
                self.max_collection_depth
            )));
        }
        Ok(())
    }

    /// The nesting bound actually enforced: the configured depth, capped at
    /// `COLLECTION_DEPTH_CEILING`.
    pub fn collection_depth_limit(&self) -> usize {
        self.max_collection_depth.min(COLLECTION_DEPTH_CEILING)
    }
}

/// Control-file discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Regex a file name must match to count as a control file.
    pub file_pattern: String,
    /// Regex identifying an issue-id directory component.
    pub issue_pattern: String,
    /// Worker threads for batch decoding (0 = one per available core).
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            file_pattern: r"^c\d{3,10}$".into(),
            issue_pattern: r"^(?:\d{6}$|\w{3}-\d{3}-\d{5})".into(),
            workers: 0,
        }
    }
}

/// Persistent tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub decoder: DecoderConfig,
    pub scan: ScanConfig,
    /// Where decoded tables are written.
    pub results_dir: PathBuf,
    /// Where collected control files are copied.
    pub control_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            scan: ScanConfig::default(),
            results_dir: PathBuf::from("results.tables"),
            control_dir: PathBuf::from("control.files"),
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file.  Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| IppspoolError::Config(format!("{}: {e}", path.display())))?;
        config.decoder.validate()?;
        Ok(config)
    }
}
