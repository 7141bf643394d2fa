// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippspool Decode: turns IPP-encoded byte streams (RFC 8010) into the
// attribute tree defined in `ippspool-core`.  Works purely on in-memory
// buffers; file handling lives in `ippspool-scan`.

pub mod cursor;
pub mod group;
pub mod message;
pub mod tree;
pub mod value;

#[cfg(test)]
mod testutil;

pub use cursor::Cursor;
pub use group::{GroupEnd, Parser};
pub use message::{Decoder, decode_message};
pub use tree::TreeBuilder;
pub use value::{decode_extension, decode_value};
