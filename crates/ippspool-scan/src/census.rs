// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Value census: which values each attribute takes across a set of files.

use std::collections::{BTreeMap, BTreeSet};

use ippspool_core::Message;

use crate::export::flatten;

/// Values longer than this (in characters) are not counted.
pub const MAX_VALUE_CHARS: usize = 20;
/// Attributes with more distinct values than this are left out of the report.
pub const MAX_DISTINCT: usize = 20;

/// Distinct values seen per attribute name.
#[derive(Debug, Default)]
pub struct Census {
    values: BTreeMap<String, BTreeSet<String>>,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every value of `message`.  Collection members are counted
    /// under their dotted path.
    pub fn add(&mut self, message: &Message) {
        for row in flatten(message) {
            if row.value.chars().count() > MAX_VALUE_CHARS {
                continue;
            }
            self.values.entry(row.name).or_default().insert(row.value);
        }
    }

    /// Distinct values for `name`.
    pub fn values(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.values.get(name)
    }

    /// Attributes that vary but not too much: between two and
    /// `MAX_DISTINCT` distinct values, fewest first.
    pub fn report(&self) -> Vec<(&str, Vec<&str>)> {
        let mut report: Vec<_> = self
            .values
            .iter()
            .filter(|(_, vals)| (2..=MAX_DISTINCT).contains(&vals.len()))
            .map(|(name, vals)| (name.as_str(), vals.iter().map(String::as_str).collect::<Vec<_>>()))
            .collect();
        report.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| a.0.cmp(b.0)));
        report
    }
}
