// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ippspool.

use thiserror::Error;

use crate::tag::Tag;

/// Length constraint a value failed to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLength {
    Exactly(usize),
    AtLeast(usize),
}

impl std::fmt::Display for ExpectedLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Why a single IPP buffer failed to decode.
///
/// Every variant is local to one buffer.  Decoding is deterministic, so
/// none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // -- Framing --
    #[error("input truncated at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid tag 0x{code:02x} at offset {offset}")]
    InvalidTag { offset: usize, code: u32 },

    // -- Values --
    #[error("invalid {tag} value length: expected {expected} bytes, got {actual}")]
    InvalidValueLength {
        tag: Tag,
        expected: ExpectedLength,
        actual: usize,
    },

    #[error("invalid {tag} value: {reason}")]
    InvalidValue { tag: Tag, reason: String },

    #[error("out-of-band {tag} value carries a {length}-byte payload")]
    NonconformingOutOfBand { tag: Tag, length: usize },

    // -- Structure --
    #[error("endCollection at offset {offset} has no matching collection")]
    UnmatchedEndCollection { offset: usize },

    #[error("collection at depth {depth} is not terminated")]
    UnterminatedCollection { depth: usize },

    #[error("collection nesting exceeds the maximum depth of {max}")]
    CollectionDepthExceeded { max: usize },

    #[error("value at offset {offset} has no attribute or member to belong to")]
    OrphanValue { offset: usize },

    #[error("collection member \"{name}\" has no value")]
    EmptyMember { name: String },

    #[error("unexpected {tag} at offset {offset}: {context}")]
    UnexpectedTag {
        offset: usize,
        tag: Tag,
        context: &'static str,
    },
}

impl DecodeError {
    /// True when the buffer simply ended too early.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. } | Self::UnterminatedCollection { .. }
        )
    }

    /// Stable kebab-case identifier, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TruncatedInput { .. } => "truncated-input",
            Self::InvalidTag { .. } => "invalid-tag",
            Self::InvalidValueLength { .. } => "invalid-value-length",
            Self::InvalidValue { .. } => "invalid-value",
            Self::NonconformingOutOfBand { .. } => "nonconforming-out-of-band",
            Self::UnmatchedEndCollection { .. } => "unmatched-end-collection",
            Self::UnterminatedCollection { .. } => "unterminated-collection",
            Self::CollectionDepthExceeded { .. } => "collection-depth-exceeded",
            Self::OrphanValue { .. } => "orphan-value",
            Self::EmptyMember { .. } => "empty-member",
            Self::UnexpectedTag { .. } => "unexpected-tag",
        }
    }
}

/// Top-level error type for all ippspool operations.
#[derive(Debug, Error)]
pub enum IppspoolError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("control-file scan failed: {0}")]
    Scan(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IppspoolError>;
