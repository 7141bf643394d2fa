// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippspool Core: types, tag table and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod tag;
pub mod types;

pub use config::{AppConfig, COLLECTION_DEPTH_CEILING, DecoderConfig, ScanConfig};
pub use error::{DecodeError, ExpectedLength, IppspoolError};
pub use tag::{Tag, TagKind, classify};
pub use types::*;
