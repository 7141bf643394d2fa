// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// IPP tag table (RFC 8010 SS3.5, plus the CUPS group extensions).
//
// Every tag code the decoder accepts is listed exactly once in the
// `ipp_tags!` invocation below.  The macro derives the enum, the code and
// name lookups, and the kind classification from that single list, so the
// mapping cannot drift.  `#[repr(u8)]` makes a duplicated code a compile
// error; `NAMES_ARE_UNIQUE` does the same for duplicated names.

use serde::{Serialize, Serializer};

/// The structural role of a tag in an IPP attribute stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Starts an attribute group, or ends the attribute section.
    GroupDelimiter,
    /// Special "no real value" marker; carries no payload.
    OutOfBand,
    /// A typed value with its own binary layout.
    Scalar,
    /// begCollection / endCollection / memberAttrName.
    CollectionControl,
    /// 0x7f: the real tag follows as a 4-byte big-endian code.
    Extension,
}

macro_rules! ipp_tags {
    ($( $(#[$doc:meta])* $variant:ident = $code:literal, $name:literal, $kind:ident; )+) => {
        /// A known IPP tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Tag {
            $( $(#[$doc])* $variant = $code, )+
        }

        impl Tag {
            /// Every known tag, in code order.
            pub const ALL: &'static [Tag] = &[ $( Tag::$variant, )+ ];

            /// Look up a tag by its one-byte wire code.
            pub const fn from_code(code: u8) -> Option<Tag> {
                match code {
                    $( $code => Some(Tag::$variant), )+
                    _ => None,
                }
            }

            /// Display name, as used by `ipptool` and the CUPS logs.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Tag::$variant => $name, )+
                }
            }

            /// Structural classification of this tag.
            pub const fn kind(self) -> TagKind {
                match self {
                    $( Tag::$variant => TagKind::$kind, )+
                }
            }
        }
    };
}

ipp_tags! {
    // -- Delimiter tags (0x01-0x0f) --
    /// Operation attributes group.
    OperationAttributes = 0x01, "operation-attributes", GroupDelimiter;
    /// Job attributes group.
    JobAttributes = 0x02, "job-attributes", GroupDelimiter;
    /// End of the attribute section; any following bytes are document data.
    EndOfAttributes = 0x03, "end-of-attributes", GroupDelimiter;
    /// Printer attributes group.
    PrinterAttributes = 0x04, "printer-attributes", GroupDelimiter;
    /// Unsupported attributes group.
    UnsupportedAttributes = 0x05, "unsupported-attributes", GroupDelimiter;
    /// Subscription attributes group (RFC 3995).
    SubscriptionAttributes = 0x06, "subscription-attributes", GroupDelimiter;
    /// Event notification attributes group (RFC 3995).
    EventNotificationAttributes = 0x07, "event-notification-attributes", GroupDelimiter;
    /// Resource attributes group.
    ResourceAttributes = 0x08, "resource-attributes", GroupDelimiter;
    /// Document attributes group.
    DocumentAttributes = 0x09, "document-attributes", GroupDelimiter;
    /// System attributes group (IPP System Service).
    SystemAttributes = 0x0a, "system-attributes", GroupDelimiter;

    // -- Out-of-band value tags (0x10-0x1f) --
    Unsupported = 0x10, "unsupported", OutOfBand;
    Default = 0x11, "default", OutOfBand;
    Unknown = 0x12, "unknown", OutOfBand;
    NoValue = 0x13, "no-value", OutOfBand;
    NotSettable = 0x15, "not-settable", OutOfBand;
    DeleteAttribute = 0x16, "delete-attribute", OutOfBand;
    AdminDefine = 0x17, "admin-define", OutOfBand;

    // -- Integer value tags (0x20-0x2f) --
    /// Signed 32-bit integer.
    Integer = 0x21, "integer", Scalar;
    /// One octet, 0x00 or 0x01.
    Boolean = 0x22, "boolean", Scalar;
    /// Same wire layout as integer.
    Enum = 0x23, "enum", Scalar;

    // -- Octet-string value tags (0x30-0x3f) --
    OctetString = 0x30, "octetString", Scalar;
    /// RFC 2579 DateAndTime, 11 octets.
    DateTime = 0x31, "dateTime", Scalar;
    Resolution = 0x32, "resolution", Scalar;
    RangeOfInteger = 0x33, "rangeOfInteger", Scalar;
    BeginCollection = 0x34, "collection", CollectionControl;
    TextWithLanguage = 0x35, "textWithLanguage", Scalar;
    NameWithLanguage = 0x36, "nameWithLanguage", Scalar;
    EndCollection = 0x37, "endCollection", CollectionControl;

    // -- Character-string value tags (0x40-0x5f) --
    TextWithoutLanguage = 0x41, "textWithoutLanguage", Scalar;
    NameWithoutLanguage = 0x42, "nameWithoutLanguage", Scalar;
    /// Reserved by RFC 8010 but written by some CUPS versions.
    ReservedString = 0x43, "reservedString", Scalar;
    Keyword = 0x44, "keyword", Scalar;
    Uri = 0x45, "uri", Scalar;
    UriScheme = 0x46, "uriScheme", Scalar;
    Charset = 0x47, "charset", Scalar;
    NaturalLanguage = 0x48, "naturalLanguage", Scalar;
    MimeMediaType = 0x49, "mimeMediaType", Scalar;
    /// Names the next member of a collection (RFC 8010 SS3.1.7).
    MemberAttrName = 0x4a, "memberName", CollectionControl;

    /// Extension point for 32-bit tags.
    Extension = 0x7f, "extension", Extension;
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const NAMES_ARE_UNIQUE: bool = {
    let mut i = 0;
    let mut unique = true;
    while i < Tag::ALL.len() {
        let mut j = i + 1;
        while j < Tag::ALL.len() {
            if str_eq(Tag::ALL[i].name(), Tag::ALL[j].name()) {
                unique = false;
            }
            j += 1;
        }
        i += 1;
    }
    unique
};

const _: () = assert!(NAMES_ARE_UNIQUE, "two IPP tags share a display name");

impl Tag {
    /// The one-byte wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn is_group_delimiter(self) -> bool {
        matches!(self.kind(), TagKind::GroupDelimiter)
    }

    pub const fn is_out_of_band(self) -> bool {
        matches!(self.kind(), TagKind::OutOfBand)
    }

    /// Tags whose value is a byte string read one code point per byte.
    pub const fn is_string(self) -> bool {
        matches!(
            self,
            Tag::OctetString
                | Tag::TextWithoutLanguage
                | Tag::NameWithoutLanguage
                | Tag::ReservedString
                | Tag::Keyword
                | Tag::Uri
                | Tag::UriScheme
                | Tag::Charset
                | Tag::NaturalLanguage
                | Tag::MimeMediaType
        )
    }
}

/// Classify a one-byte tag code.  `None` means the code is outside the
/// known tag space.
pub const fn classify(code: u8) -> Option<TagKind> {
    match Tag::from_code(code) {
        Some(tag) => Some(tag.kind()),
        None => None,
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
