// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test-only IPP encoder used to synthesize decoder input.

use ippspool_core::{Attribute, Tag, Value};

/// Builds binary IPP messages entry by entry.
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    /// Start a message with the given header.
    pub fn new(operation_or_status: u16, request_id: u32) -> Self {
        let mut buf = Vec::with_capacity(256);
        // version-number: IPP 1.1
        buf.push(0x01);
        buf.push(0x01);
        buf.extend_from_slice(&operation_or_status.to_be_bytes());
        buf.extend_from_slice(&request_id.to_be_bytes());
        Self { buf }
    }

    /// A bare attribute stream with no header.
    pub fn attributes_only() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn begin_group(&mut self, delimiter: Tag) -> &mut Self {
        self.buf.push(delimiter.code());
        self
    }

    pub fn keyword(&mut self, name: &str, value: &str) -> &mut Self {
        self.write_attr(Tag::Keyword.code(), name, value.as_bytes())
    }

    /// Additional value of a 1setOf keyword (name-length 0).
    pub fn keyword_additional(&mut self, value: &str) -> &mut Self {
        self.write_attr(Tag::Keyword.code(), "", value.as_bytes())
    }

    pub fn integer(&mut self, name: &str, value: i32) -> &mut Self {
        self.write_attr(Tag::Integer.code(), name, &value.to_be_bytes())
    }

    pub fn begin_collection(&mut self, name: &str) -> &mut Self {
        self.write_attr(Tag::BeginCollection.code(), name, &[])
    }

    pub fn member_name(&mut self, member: &str) -> &mut Self {
        self.write_attr(Tag::MemberAttrName.code(), "", member.as_bytes())
    }

    pub fn end_collection(&mut self) -> &mut Self {
        self.write_attr(Tag::EndCollection.code(), "", &[])
    }

    /// `depth` collections nested under `name`; the innermost holds one
    /// integer member.
    pub fn nested_collection(&mut self, name: &str, depth: usize, value: i32) -> &mut Self {
        self.begin_collection(name);
        for _ in 1..depth {
            self.member_name("inner");
            self.begin_collection("");
        }
        self.member_name("value");
        self.integer("", value);
        for _ in 0..depth {
            self.end_collection();
        }
        self
    }

    /// Encode a decoded attribute back to its wire form.
    pub fn attribute(&mut self, attr: &Attribute) -> &mut Self {
        for (i, value) in attr.value.values().iter().enumerate() {
            let name = if i == 0 { attr.name.as_str() } else { "" };
            self.value(attr.tag, name, value);
        }
        self
    }

    fn value(&mut self, tag: Tag, name: &str, value: &Value) {
        match value {
            Value::Collection(members) => {
                self.begin_collection(name);
                for member in members {
                    self.member_name(&member.name);
                    for v in member.value.values() {
                        self.value(member.tag, "", v);
                    }
                }
                self.end_collection();
            }
            Value::OutOfBand(oob) => {
                self.write_attr(oob.code(), name, &[]);
            }
            Value::NonconformingOutOfBand { tag, payload } => {
                self.write_attr(tag.code(), name, payload);
            }
            other => {
                self.write_attr(tag.code(), name, &encode_value(other));
            }
        }
    }

    pub fn end_of_attributes(&mut self) -> &mut Self {
        self.buf.push(Tag::EndOfAttributes.code());
        self
    }

    /// Write a raw attribute (value-tag, name, value bytes).
    pub fn write_attr(&mut self, value_tag: u8, name: &str, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(&entry(value_tag, name, value));
        self
    }

    /// Append opaque bytes (document data).
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Finalise: write end-of-attributes and return the bytes.
    pub fn build(mut self) -> Vec<u8> {
        self.end_of_attributes();
        self.buf
    }

    /// The bytes written so far, with nothing appended.
    pub fn into_attribute_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// One encoded entry: tag, name-length, name, value-length, value.
pub fn entry(value_tag: u8, name: &str, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5 + name.len() + value.len());
    buf.push(value_tag);
    buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(&(value.len() as u16).to_be_bytes());
    buf.extend_from_slice(value);
    buf
}

fn encode_value(value: &Value) -> Vec<u8> {
    match value {
        Value::Integer(v) | Value::Enum(v) => v.to_be_bytes().to_vec(),
        Value::Boolean(v) => vec![u8::from(*v)],
        Value::String(s) => latin1_bytes(s),
        Value::DateTime(dt) => {
            let mut b = dt.year.to_be_bytes().to_vec();
            b.extend_from_slice(&[
                dt.month,
                dt.day,
                dt.hour,
                dt.minute,
                dt.second,
                dt.deciseconds,
                dt.utc_direction,
                dt.utc_hours,
                dt.utc_minutes,
            ]);
            b
        }
        Value::Resolution(r) => {
            let mut b = r.x.to_be_bytes().to_vec();
            b.extend_from_slice(&r.y.to_be_bytes());
            b.push(r.units);
            b
        }
        Value::Range(r) => {
            let mut b = r.lower.to_be_bytes().to_vec();
            b.extend_from_slice(&r.upper.to_be_bytes());
            b
        }
        Value::WithLanguage(s) => {
            let (language, text) = (latin1_bytes(&s.language), latin1_bytes(&s.text));
            let mut b = (language.len() as u16).to_be_bytes().to_vec();
            b.extend_from_slice(&language);
            b.extend_from_slice(&(text.len() as u16).to_be_bytes());
            b.extend_from_slice(&text);
            b
        }
        Value::Extension { data, .. } => data.clone(),
        Value::OutOfBand(_) | Value::NonconformingOutOfBand { .. } | Value::Collection(_) => {
            Vec::new()
        }
    }
}

fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| c as u8).collect()
}
