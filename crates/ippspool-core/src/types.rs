// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The decoded attribute tree: messages, groups, attributes and values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::tag::Tag;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// RFC 2579 DateAndTime as carried by the `dateTime` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IppDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// 0..=60; 60 marks a leap second.
    pub second: u8,
    pub deciseconds: u8,
    /// `b'+'` or `b'-'`.
    pub utc_direction: u8,
    pub utc_hours: u8,
    pub utc_minutes: u8,
}

impl IppDateTime {
    /// Calendar timestamp from the first six fields.
    ///
    /// A leap second (60) is clamped to 59.  Returns `None` when the
    /// fields do not form a real date or time.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.min(59).into(),
        )
    }

    /// The encoded offset from UTC.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        let seconds = i32::from(self.utc_hours) * 3600 + i32::from(self.utc_minutes) * 60;
        match self.utc_direction {
            b'+' => FixedOffset::east_opt(seconds),
            b'-' => FixedOffset::west_opt(seconds),
            _ => None,
        }
    }

    /// Timestamp with its offset applied.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp()?
            .and_local_timezone(self.utc_offset()?)
            .single()
    }
}

impl std::fmt::Display for IppDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.timestamp() {
            Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            None => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            ),
        }
    }
}

impl Serialize for IppDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(dt) => dt.serialize(serializer),
            None => serializer.collect_str(self),
        }
    }
}

/// Printer resolution (`resolution` tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub x: i32,
    pub y: i32,
    /// 3 = dots per inch, 4 = dots per centimetre.
    pub units: u8,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.units {
            3 => write!(f, "{}x{}dpi", self.x, self.y),
            4 => write!(f, "{}x{}dpcm", self.x, self.y),
            other => write!(f, "{}x{} (units {other})", self.x, self.y),
        }
    }
}

/// Inclusive integer range (`rangeOfInteger` tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub lower: i32,
    pub upper: i32,
}

/// textWithLanguage / nameWithLanguage composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringWithLanguage {
    pub language: String,
    pub text: String,
}

/// A single decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i32),
    Enum(i32),
    Boolean(bool),
    /// Any string-family tag, one code point per input byte.
    String(String),
    DateTime(IppDateTime),
    Resolution(Resolution),
    Range(Range),
    WithLanguage(StringWithLanguage),
    /// An out-of-band marker (no-value, unknown, ...).
    OutOfBand(Tag),
    /// An out-of-band marker that arrived with a payload it should not have.
    /// Some vendors (notably Brother) write text here.
    NonconformingOutOfBand { tag: Tag, payload: Vec<u8> },
    /// A nested collection: member name to attribute.
    Collection(AttributeMap),
    /// A value under a 32-bit extension tag with no known layout.
    Extension { code: u32, data: Vec<u8> },
}

impl Value {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) | Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::WithLanguage(s) => Some(&s.text),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&AttributeMap> {
        match self {
            Value::Collection(members) => Some(members),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) | Value::Enum(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Resolution(r) => write!(f, "{r}"),
            Value::Range(r) => write!(f, "{}-{}", r.lower, r.upper),
            Value::WithLanguage(s) => write!(f, "{} ({})", s.text, s.language),
            Value::OutOfBand(tag) => write!(f, "<{tag}>"),
            Value::NonconformingOutOfBand { tag, payload } => {
                write!(f, "<{tag}> {}", latin1(payload))
            }
            Value::Collection(members) => {
                f.write_str("{")?;
                for (i, attr) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", attr.name, attr.value)?;
                }
                f.write_str("}")
            }
            Value::Extension { code, data } => write!(f, "<extension 0x{code:08x}> {} bytes", data.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(v) | Value::Enum(v) => serializer.serialize_i32(*v),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => dt.serialize(serializer),
            Value::Resolution(r) => r.serialize(serializer),
            Value::Range(r) => r.serialize(serializer),
            Value::WithLanguage(s) => s.serialize(serializer),
            Value::OutOfBand(tag) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("out-of-band", tag)?;
                map.end()
            }
            Value::NonconformingOutOfBand { tag, payload } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("out-of-band", tag)?;
                map.serialize_entry("payload", &latin1(payload))?;
                map.end()
            }
            Value::Collection(members) => members.serialize(serializer),
            Value::Extension { code, data } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("extension", code)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
        }
    }
}

/// Read bytes one code point per byte (ISO-8859-1).
///
/// Control files are not guaranteed to be UTF-8, and this mapping never
/// fails or loses a byte.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// The value shape of an attribute: a single value or an ordered 1setOf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    One(Value),
    Set(Vec<Value>),
}

impl AttributeValue {
    /// Build from values in arrival order.  `None` for an empty list.
    pub fn from_values(mut values: Vec<Value>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(AttributeValue::One),
            _ => Some(AttributeValue::Set(values)),
        }
    }

    pub fn values(&self) -> &[Value] {
        match self {
            AttributeValue::One(v) => std::slice::from_ref(v),
            AttributeValue::Set(vs) => vs,
        }
    }

    /// The first value; `None` only for a hand-built empty `Set`.
    pub fn first(&self) -> Option<&Value> {
        self.values().first()
    }

    pub fn is_set(&self) -> bool {
        matches!(self, AttributeValue::Set(_))
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::One(v) => write!(f, "{v}"),
            AttributeValue::Set(vs) => {
                f.write_str("[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributeValue::One(v) => v.serialize(serializer),
            AttributeValue::Set(vs) => vs.serialize(serializer),
        }
    }
}

/// A named attribute (or collection member).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Tag of the first value.
    pub tag: Tag,
    pub value: AttributeValue,
}

/// Ordered name-to-attribute map used for groups and collections.
///
/// Insertion order is kept.  Re-inserting an existing name replaces the
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<Attribute>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the one it replaced.
    pub fn insert(&mut self, attr: Attribute) -> Option<Attribute> {
        match self.entries.iter_mut().find(|a| a.name == attr.name) {
            Some(slot) => Some(std::mem::replace(slot, attr)),
            None => {
                self.entries.push(attr);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.iter().find(|a| a.name == name)
    }

    /// Convenience: the first value of the named attribute.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(|a| a.value.first())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serialized entry of an [`AttributeMap`]: `{"tag": ..., "value": ...}`.
#[derive(Serialize)]
struct TaggedValue<'a> {
    tag: Tag,
    value: &'a AttributeValue,
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for attr in &self.entries {
            map.serialize_entry(
                &attr.name,
                &TaggedValue {
                    tag: attr.tag,
                    value: &attr.value,
                },
            )?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Groups and messages
// ---------------------------------------------------------------------------

/// One attribute group, introduced by a delimiter tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub tag: Tag,
    pub attributes: AttributeMap,
}

impl Group {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: AttributeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.tag.name()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

/// IPP version number (`1.1`, `2.0`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A fully decoded IPP message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub version: Version,
    /// Operation-id in a request, status-code in a response.
    pub operation_or_status: u16,
    pub request_id: u32,
    pub groups: Vec<Group>,
    /// Whether the attribute section ended with an end-of-attributes tag.
    pub end_of_attributes: bool,
    /// Bytes after the attribute section (document data), never decoded.
    #[serde(rename = "trailing_bytes", serialize_with = "serialize_len")]
    pub trailing: Vec<u8>,
}

impl Message {
    /// The first group with the given delimiter.
    pub fn group(&self, tag: Tag) -> Option<&Group> {
        self.groups.iter().find(|g| g.tag == tag)
    }

    /// The first attribute with the given name in any group.
    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.groups.iter().find_map(|g| g.get(name))
    }
}

fn serialize_len<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}
