// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippspool Scan: finds CUPS control files on disk, deduplicates and
// collects them, decodes them in bulk, and exports the results as CSV/JSON
// tables and a value census.

pub mod batch;
pub mod catalog;
pub mod census;
pub mod collect;
pub mod discovery;
pub mod export;

pub use batch::{BatchReport, decode_batch, decode_file};
pub use catalog::{CatalogEntry, catalog, hash_bytes};
pub use census::Census;
pub use collect::{CollectReport, collect};
pub use discovery::{ControlFile, Discovery, input_files};
pub use export::{Row, flatten, save_table, write_csv, write_json};
