// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed decoding of a single attribute value (RFC 8010 SS3.9).
//
// The caller has already sliced the value to its declared value-length;
// this module only checks that the length fits the tag and turns the
// bytes into a `Value`.

use ippspool_core::{
    DecodeError, ExpectedLength, IppDateTime, Range, Resolution, StringWithLanguage, Tag, TagKind,
    Value, latin1,
};

use crate::cursor::Cursor;

/// Decode `bytes` as a value of type `tag`.
///
/// Out-of-band tags with a payload come back as
/// `Value::NonconformingOutOfBand`; whether that is acceptable is the
/// caller's decision.  Collection-control and delimiter tags are not
/// values and are rejected.
pub fn decode_value(tag: Tag, bytes: &[u8]) -> Result<Value, DecodeError> {
    match tag.kind() {
        TagKind::OutOfBand => {
            return Ok(if bytes.is_empty() {
                Value::OutOfBand(tag)
            } else {
                Value::NonconformingOutOfBand {
                    tag,
                    payload: bytes.to_vec(),
                }
            });
        }
        TagKind::Scalar => {}
        _ => {
            return Err(DecodeError::InvalidValue {
                tag,
                reason: "not a value tag".into(),
            });
        }
    }

    if tag.is_string() {
        return Ok(Value::String(latin1(bytes)));
    }

    match tag {
        Tag::Integer => Ok(Value::Integer(be_i32(fixed::<4>(tag, bytes)?))),
        Tag::Enum => Ok(Value::Enum(be_i32(fixed::<4>(tag, bytes)?))),
        Tag::Boolean => match fixed::<1>(tag, bytes)? {
            [0x00] => Ok(Value::Boolean(false)),
            [0x01] => Ok(Value::Boolean(true)),
            [other] => Err(DecodeError::InvalidValue {
                tag,
                reason: format!("boolean octet 0x{other:02x} is neither 0 nor 1"),
            }),
        },
        Tag::DateTime => decode_datetime(fixed::<11>(tag, bytes)?).map(Value::DateTime),
        Tag::Resolution => {
            let b = fixed::<9>(tag, bytes)?;
            Ok(Value::Resolution(Resolution {
                x: be_i32([b[0], b[1], b[2], b[3]]),
                y: be_i32([b[4], b[5], b[6], b[7]]),
                units: b[8],
            }))
        }
        Tag::RangeOfInteger => {
            let b = fixed::<8>(tag, bytes)?;
            Ok(Value::Range(Range {
                lower: be_i32([b[0], b[1], b[2], b[3]]),
                upper: be_i32([b[4], b[5], b[6], b[7]]),
            }))
        }
        Tag::TextWithLanguage | Tag::NameWithLanguage => {
            decode_with_language(tag, bytes).map(Value::WithLanguage)
        }
        _ => Err(DecodeError::InvalidValue {
            tag,
            reason: "no decoder for this value tag".into(),
        }),
    }
}

/// Value under a 32-bit extension tag: kept as raw octets.
pub fn decode_extension(code: u32, bytes: &[u8]) -> Value {
    Value::Extension {
        code,
        data: bytes.to_vec(),
    }
}

fn fixed<const N: usize>(tag: Tag, bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    bytes
        .try_into()
        .map_err(|_| DecodeError::InvalidValueLength {
            tag,
            expected: ExpectedLength::Exactly(N),
            actual: bytes.len(),
        })
}

fn be_i32(b: [u8; 4]) -> i32 {
    i32::from_be_bytes(b)
}

/// RFC 2579 DateAndTime:
///
/// ```text
/// octets  contents          range
///  1-2    year              0..65535
///   3     month             1..12
///   4     day               1..31
///   5     hour              0..23
///   6     minutes           0..59
///   7     seconds           0..60 (60 = leap second)
///   8     deci-seconds      0..9
///   9     direction from UTC '+' / '-'
///  10     hours from UTC    0..14
///  11     minutes from UTC  0..59
/// ```
fn decode_datetime(b: [u8; 11]) -> Result<IppDateTime, DecodeError> {
    let dt = IppDateTime {
        year: u16::from_be_bytes([b[0], b[1]]),
        month: b[2],
        day: b[3],
        hour: b[4],
        minute: b[5],
        second: b[6],
        deciseconds: b[7],
        utc_direction: b[8],
        utc_hours: b[9],
        utc_minutes: b[10],
    };

    let problem = if !(1..=12).contains(&dt.month) {
        Some(format!("month {} out of range", dt.month))
    } else if !(1..=31).contains(&dt.day) {
        Some(format!("day {} out of range", dt.day))
    } else if dt.hour > 23 || dt.minute > 59 || dt.second > 60 {
        Some(format!(
            "time {:02}:{:02}:{:02} out of range",
            dt.hour, dt.minute, dt.second
        ))
    } else if dt.deciseconds > 9 {
        Some(format!("deci-seconds {} out of range", dt.deciseconds))
    } else if dt.utc_direction != b'+' && dt.utc_direction != b'-' {
        Some(format!("UTC direction 0x{:02x} is not '+' or '-'", dt.utc_direction))
    } else if dt.utc_hours > 14 || dt.utc_minutes > 59 {
        Some(format!(
            "UTC offset {:02}:{:02} out of range",
            dt.utc_hours, dt.utc_minutes
        ))
    } else if dt.timestamp().is_none() {
        Some(format!(
            "{:04}-{:02}-{:02} is not a calendar date",
            dt.year, dt.month, dt.day
        ))
    } else {
        None
    };

    match problem {
        None => Ok(dt),
        Some(reason) => Err(DecodeError::InvalidValue {
            tag: Tag::DateTime,
            reason,
        }),
    }
}

/// textWithLanguage / nameWithLanguage (RFC 8010 SS3.9):
///
/// ```text
/// language-length  2 bytes
/// language         language-length bytes
/// text-length      2 bytes
/// text             text-length bytes
/// ```
///
/// The two parts must fill the value exactly.
fn decode_with_language(tag: Tag, bytes: &[u8]) -> Result<StringWithLanguage, DecodeError> {
    if bytes.len() < 4 {
        return Err(DecodeError::InvalidValueLength {
            tag,
            expected: ExpectedLength::AtLeast(4),
            actual: bytes.len(),
        });
    }

    let malformed = |e: DecodeError| DecodeError::InvalidValue {
        tag,
        reason: format!("composite value overruns its length ({e})"),
    };

    let mut inner = Cursor::new(bytes);
    let language_len = inner.read_u16().map_err(malformed)?;
    let language = inner.read(language_len.into()).map_err(malformed)?;
    let text_len = inner.read_u16().map_err(malformed)?;
    let text = inner.read(text_len.into()).map_err(malformed)?;

    if !inner.is_empty() {
        return Err(DecodeError::InvalidValue {
            tag,
            reason: format!("{} stray bytes after the text", inner.remaining()),
        });
    }

    Ok(StringWithLanguage {
        language: latin1(language),
        text: latin1(text),
    })
}
