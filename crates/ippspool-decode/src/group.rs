// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recursive-descent parser for attribute groups and collection values.
//
// Each attribute entry is encoded as (RFC 8010 SS3.1.4):
//
// ```text
// value-tag      1 byte   (0x7f: followed by a 4-byte extension tag)
// name-length    2 bytes
// name           name-length bytes
// value-length   2 bytes
// value          value-length bytes
// ```
//
// A zero name-length marks an additional value of the preceding attribute.
// Collections (RFC 8010 SS3.1.6) nest as:
//
// ```text
// begCollection   name="media-col"  value=""
//   memberAttrName name=""           value="media-size"
//   begCollection  name=""           value=""
//     memberAttrName name=""         value="x-dimension"
//     integer        name=""         value=21000
//   endCollection  name=""           value=""
// endCollection    name=""           value=""
// ```

use tracing::{debug, trace, warn};

use ippspool_core::{
    AttributeMap, DecodeError, DecoderConfig, ExpectedLength, Group, Tag, TagKind, Value, latin1,
};

use crate::cursor::Cursor;
use crate::tree::TreeBuilder;
use crate::value::{decode_extension, decode_value};

/// How a top-level group ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEnd {
    /// Another group starts with this delimiter (already consumed).
    Delimiter(Tag),
    /// The end-of-attributes tag was read.
    EndOfAttributes,
    /// The buffer ran out.
    Exhausted,
}

/// A tag as read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryTag {
    Known(Tag),
    /// 32-bit extension code with no one-byte equivalent.
    Extended(u32),
}

impl EntryTag {
    fn tag(self) -> Tag {
        match self {
            EntryTag::Known(tag) => tag,
            EntryTag::Extended(_) => Tag::Extension,
        }
    }

    fn delimiter(self) -> Option<Tag> {
        match self {
            EntryTag::Known(tag) if tag.is_group_delimiter() => Some(tag),
            _ => None,
        }
    }
}

/// Parser state for one message: the cursor plus decoder settings.
pub struct Parser<'a, 'c> {
    cursor: Cursor<'a>,
    config: &'c DecoderConfig,
}

impl<'a, 'c> Parser<'a, 'c> {
    pub fn new(cursor: Cursor<'a>, config: &'c DecoderConfig) -> Self {
        Self { cursor, config }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Consume whatever follows the attribute section.
    pub fn rest(&mut self) -> &'a [u8] {
        self.cursor.rest()
    }

    /// Read the delimiter that opens the next group.
    ///
    /// Only valid between groups: any other tag here is an attribute with
    /// no group to belong to.
    pub fn next_delimiter(&mut self) -> Result<GroupEnd, DecodeError> {
        if self.cursor.is_empty() {
            return Ok(GroupEnd::Exhausted);
        }
        let offset = self.cursor.position();
        let tag = self.read_tag()?;
        match tag.delimiter() {
            Some(Tag::EndOfAttributes) => Ok(GroupEnd::EndOfAttributes),
            Some(delimiter) => Ok(GroupEnd::Delimiter(delimiter)),
            None => Err(DecodeError::UnexpectedTag {
                offset,
                tag: tag.tag(),
                context: "attribute before the first group delimiter",
            }),
        }
    }

    /// Parse the attributes of one group whose delimiter has just been read.
    ///
    /// Stops at the next delimiter, which is returned rather than treated
    /// as part of this group.
    pub fn parse_group(&mut self, delimiter: Tag) -> Result<(Group, GroupEnd), DecodeError> {
        let mut builder = TreeBuilder::new();

        let end = loop {
            if self.cursor.is_empty() {
                break GroupEnd::Exhausted;
            }
            let offset = self.cursor.position();
            let tag = self.read_tag()?;
            match tag.delimiter() {
                Some(Tag::EndOfAttributes) => break GroupEnd::EndOfAttributes,
                Some(next) => break GroupEnd::Delimiter(next),
                None => {}
            }

            let name = self.read_field()?;
            let value = self.read_field()?;
            trace!(offset, tag = %tag.tag(), name = %latin1(name), len = value.len(), "entry");

            match tag {
                EntryTag::Known(Tag::EndCollection) => {
                    return Err(DecodeError::UnmatchedEndCollection { offset });
                }
                EntryTag::Known(Tag::MemberAttrName) => {
                    return Err(DecodeError::UnexpectedTag {
                        offset,
                        tag: Tag::MemberAttrName,
                        context: "member name outside a collection",
                    });
                }
                _ => {}
            }

            if !name.is_empty() {
                builder.start(latin1(name))?;
            } else if !builder.is_collecting() {
                return Err(DecodeError::OrphanValue { offset });
            }

            let (tag, value) = self.entry_value(tag, value, 0)?;
            builder.push(tag, value);
        };

        let attributes = builder.finish()?;
        debug!(group = %delimiter, attributes = attributes.len(), "group decoded");
        Ok((
            Group {
                tag: delimiter,
                attributes,
            },
            end,
        ))
    }

    /// Parse collection members until the matching endCollection.
    ///
    /// `depth` is the nesting level of this collection; top-level
    /// collection attributes are depth 1.
    fn parse_collection(&mut self, depth: usize) -> Result<AttributeMap, DecodeError> {
        let max = self.config.collection_depth_limit();
        if depth > max {
            return Err(DecodeError::CollectionDepthExceeded { max });
        }

        let mut members = TreeBuilder::new();
        loop {
            if self.cursor.is_empty() {
                return Err(DecodeError::UnterminatedCollection { depth });
            }
            let offset = self.cursor.position();
            let tag = self.read_tag()?;
            if tag.delimiter().is_some() {
                return Err(DecodeError::UnterminatedCollection { depth });
            }

            let name = self.read_field()?;
            let value = self.read_field()?;
            trace!(offset, depth, tag = %tag.tag(), len = value.len(), "member entry");

            if !name.is_empty() {
                return Err(DecodeError::UnexpectedTag {
                    offset,
                    tag: tag.tag(),
                    context: "named attribute inside a collection",
                });
            }

            match tag {
                EntryTag::Known(Tag::EndCollection) => {
                    expect_empty(Tag::EndCollection, value)?;
                    return members.finish();
                }
                EntryTag::Known(Tag::MemberAttrName) => {
                    if value.is_empty() {
                        return Err(DecodeError::InvalidValueLength {
                            tag: Tag::MemberAttrName,
                            expected: ExpectedLength::AtLeast(1),
                            actual: 0,
                        });
                    }
                    members.start(latin1(value))?;
                }
                _ => {
                    if !members.is_collecting() {
                        return Err(DecodeError::OrphanValue { offset });
                    }
                    let (tag, value) = self.entry_value(tag, value, depth)?;
                    members.push(tag, value);
                }
            }
        }
    }

    /// Decode the value of an entry found at nesting level `depth`.
    fn entry_value(
        &mut self,
        tag: EntryTag,
        value: &[u8],
        depth: usize,
    ) -> Result<(Tag, Value), DecodeError> {
        let tag = match tag {
            EntryTag::Extended(code) => return Ok((Tag::Extension, decode_extension(code, value))),
            EntryTag::Known(tag) => tag,
        };

        if tag == Tag::BeginCollection {
            expect_empty(tag, value)?;
            let members = self.parse_collection(depth + 1)?;
            return Ok((tag, Value::Collection(members)));
        }

        let decoded = decode_value(tag, value)?;
        if let Value::NonconformingOutOfBand { tag, payload } = &decoded {
            if self.config.strict_out_of_band {
                return Err(DecodeError::NonconformingOutOfBand {
                    tag: *tag,
                    length: payload.len(),
                });
            }
            warn!(tag = %tag, len = payload.len(), "out-of-band value with payload");
        }
        Ok((tag, decoded))
    }

    /// Read a tag, following the 0x7f extension mechanism.
    fn read_tag(&mut self) -> Result<EntryTag, DecodeError> {
        let offset = self.cursor.position();
        let code = self.cursor.read_u8()?;
        let tag = Tag::from_code(code).ok_or(DecodeError::InvalidTag {
            offset,
            code: code.into(),
        })?;
        if tag != Tag::Extension {
            return Ok(EntryTag::Known(tag));
        }

        let code = self.cursor.read_u32()?;
        if code & 0x8000_0000 != 0 {
            return Err(DecodeError::InvalidTag { offset, code });
        }
        match u8::try_from(code).ok().and_then(Tag::from_code) {
            Some(tag) if matches!(tag.kind(), TagKind::Scalar | TagKind::OutOfBand) => {
                Ok(EntryTag::Known(tag))
            }
            Some(_) => Err(DecodeError::InvalidTag { offset, code }),
            None => Ok(EntryTag::Extended(code)),
        }
    }

    /// A 2-byte length followed by that many bytes.
    fn read_field(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.cursor.read_u16()?;
        self.cursor.read(len.into())
    }
}

fn expect_empty(tag: Tag, value: &[u8]) -> Result<(), DecodeError> {
    if value.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::InvalidValueLength {
            tag,
            expected: ExpectedLength::Exactly(0),
            actual: value.len(),
        })
    }
}
