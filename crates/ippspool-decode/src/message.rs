// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Top-level IPP message decoding (RFC 8010 SS3.1.1).
//
// ```text
// version-number          2 bytes  (major, minor)
// operation-id / status   2 bytes  (big-endian u16)
// request-id              4 bytes  (big-endian u32)
// attribute-group         n bytes  (0 or more)
// end-of-attributes-tag   1 byte
// data                    q bytes  (optional, never decoded here)
// ```

use tracing::{debug, instrument};

use ippspool_core::{DecodeError, DecoderConfig, Message, Version};

use crate::cursor::Cursor;
use crate::group::{GroupEnd, Parser};

/// Decodes IPP messages under a fixed configuration.
///
/// Holds no state between calls; one decoder may be shared by any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one complete message.
    #[instrument(skip_all, fields(len = data.len()))]
    pub fn decode(&self, data: &[u8]) -> Result<Message, DecodeError> {
        let mut cursor = Cursor::new(data);
        let version = cursor.read(2)?;
        let version = Version {
            major: version[0],
            minor: version[1],
        };
        let operation_or_status = cursor.read_u16()?;
        let request_id = cursor.read_u32()?;
        debug!(%version, operation_or_status, request_id, "header");

        let mut parser = Parser::new(cursor, &self.config);
        let mut groups = Vec::new();
        let mut next = parser.next_delimiter()?;
        let end_of_attributes = loop {
            match next {
                GroupEnd::Delimiter(delimiter) => {
                    let (group, end) = parser.parse_group(delimiter)?;
                    groups.push(group);
                    next = end;
                }
                GroupEnd::EndOfAttributes => break true,
                GroupEnd::Exhausted if self.config.require_end_of_attributes => {
                    return Err(DecodeError::TruncatedInput {
                        offset: parser.position(),
                        needed: 1,
                        remaining: 0,
                    });
                }
                GroupEnd::Exhausted => break false,
            }
        };

        let trailing = parser.rest().to_vec();
        debug!(
            groups = groups.len(),
            end_of_attributes,
            trailing = trailing.len(),
            "message decoded"
        );

        Ok(Message {
            version,
            operation_or_status,
            request_id,
            groups,
            end_of_attributes,
            trailing,
        })
    }
}

/// Decode with the default configuration.
pub fn decode_message(data: &[u8]) -> Result<Message, DecodeError> {
    Decoder::default().decode(data)
}
