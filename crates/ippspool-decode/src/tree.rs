// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute tree builder.
//
// Collects values for the attribute (or collection member) currently being
// read, and flushes it into an ordered `AttributeMap` when the next name
// starts or the enclosing group/collection ends.

use tracing::warn;

use ippspool_core::{Attribute, AttributeMap, AttributeValue, DecodeError, Tag, Value};

/// Attribute whose values are still arriving.
#[derive(Debug)]
struct Pending {
    name: String,
    /// Tag of the first value; `None` until one arrives.
    tag: Option<Tag>,
    values: Vec<Value>,
}

/// Builds one `AttributeMap` in arrival order.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    map: AttributeMap,
    pending: Option<Pending>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flush the current attribute and start collecting values for `name`.
    pub fn start(&mut self, name: String) -> Result<(), DecodeError> {
        self.flush()?;
        self.pending = Some(Pending {
            name,
            tag: None,
            values: Vec::new(),
        });
        Ok(())
    }

    /// Whether an attribute has been started and can take values.
    pub fn is_collecting(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a value to the current attribute.  Callers check
    /// `is_collecting` first; with no attribute started this is a no-op.
    pub fn push(&mut self, tag: Tag, value: Value) {
        if let Some(pending) = self.pending.as_mut() {
            pending.tag.get_or_insert(tag);
            pending.values.push(value);
        }
    }

    /// Flush the last attribute and return the finished map.
    pub fn finish(mut self) -> Result<AttributeMap, DecodeError> {
        self.flush()?;
        Ok(self.map)
    }

    fn flush(&mut self) -> Result<(), DecodeError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let (Some(tag), Some(value)) = (pending.tag, AttributeValue::from_values(pending.values))
        else {
            return Err(DecodeError::EmptyMember { name: pending.name });
        };

        let attr = Attribute {
            name: pending.name,
            tag,
            value,
        };
        if let Some(old) = self.map.insert(attr) {
            warn!(name = %old.name, "duplicate attribute name, later value kept");
        }
        Ok(())
    }
}
