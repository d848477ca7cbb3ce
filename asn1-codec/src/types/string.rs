//! Character string types
//!
//! All string types share one representation, [`Asn1String`]: a kind plus
//! the raw contents octets. The kind decides how octets map to text:
//!
//! | Kind | Tag | Text mapping |
//! |------|-----|--------------|
//! | UTF8String | 0x0C | UTF-8 |
//! | NumericString, PrintableString, IA5String, VisibleString | 0x12, 0x13, 0x16, 0x1A | ASCII subset |
//! | T61String | 0x14 | one octet per character (Latin-1) |
//! | GraphicString, GeneralString | 0x19, 0x1B | one octet per character |
//! | UTCTime, GeneralizedTime | 0x17, 0x18 | ASCII |
//! | UniversalString | 0x1C | UTF-32BE |
//! | BMPString | 0x1E | UTF-16BE |
//!
//! Decoding never validates the character set; text construction does.

use crate::coerce::{Asn1Type, coercion_error};
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use std::fmt;

/// String kind, one per universal string tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StringKind {
    Utf8,
    Numeric,
    Printable,
    T61,
    Ia5,
    UtcTime,
    GeneralizedTime,
    Graphic,
    Visible,
    General,
    Universal,
    Bmp,
}

impl StringKind {
    pub const ALL: [StringKind; 12] = [
        StringKind::Utf8,
        StringKind::Numeric,
        StringKind::Printable,
        StringKind::T61,
        StringKind::Ia5,
        StringKind::UtcTime,
        StringKind::GeneralizedTime,
        StringKind::Graphic,
        StringKind::Visible,
        StringKind::General,
        StringKind::Universal,
        StringKind::Bmp,
    ];

    pub const fn tag_number(self) -> u32 {
        match self {
            StringKind::Utf8 => universal::UTF8_STRING,
            StringKind::Numeric => universal::NUMERIC_STRING,
            StringKind::Printable => universal::PRINTABLE_STRING,
            StringKind::T61 => universal::T61_STRING,
            StringKind::Ia5 => universal::IA5_STRING,
            StringKind::UtcTime => universal::UTC_TIME,
            StringKind::GeneralizedTime => universal::GENERALIZED_TIME,
            StringKind::Graphic => universal::GRAPHIC_STRING,
            StringKind::Visible => universal::VISIBLE_STRING,
            StringKind::General => universal::GENERAL_STRING,
            StringKind::Universal => universal::UNIVERSAL_STRING,
            StringKind::Bmp => universal::BMP_STRING,
        }
    }

    pub fn from_tag_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag_number() == number)
    }

    pub const fn name(self) -> &'static str {
        match self {
            StringKind::Utf8 => "UTF8String",
            StringKind::Numeric => "NumericString",
            StringKind::Printable => "PrintableString",
            StringKind::T61 => "T61String",
            StringKind::Ia5 => "IA5String",
            StringKind::UtcTime => "UTCTime",
            StringKind::GeneralizedTime => "GeneralizedTime",
            StringKind::Graphic => "GraphicString",
            StringKind::Visible => "VisibleString",
            StringKind::General => "GeneralString",
            StringKind::Universal => "UniversalString",
            StringKind::Bmp => "BMPString",
        }
    }

    /// Is `c` allowed by this kind's character set?
    fn allows(self, c: char) -> bool {
        match self {
            StringKind::Utf8 | StringKind::Universal => true,
            StringKind::Bmp => (c as u32) <= 0xFFFF,
            StringKind::T61 | StringKind::Graphic | StringKind::General => (c as u32) <= 0xFF,
            StringKind::Ia5 => c.is_ascii(),
            StringKind::Visible | StringKind::UtcTime | StringKind::GeneralizedTime => {
                (' '..='~').contains(&c)
            }
            StringKind::Numeric => c == ' ' || c.is_ascii_digit(),
            StringKind::Printable => {
                c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
            }
        }
    }

    fn encode_text(self, text: &str) -> Asn1Result<Vec<u8>> {
        if let Some(bad) = text.chars().find(|c| !self.allows(*c)) {
            return Err(Asn1Error::InvalidArgument(format!(
                "character {:?} not allowed in {}",
                bad,
                self.name()
            )));
        }

        let octets = match self {
            StringKind::Utf8 => text.as_bytes().to_vec(),
            StringKind::Bmp => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            StringKind::Universal => text.chars().flat_map(|c| (c as u32).to_be_bytes()).collect(),
            _ => text.chars().map(|c| c as u8).collect(),
        };
        Ok(octets)
    }

    fn decode_text(self, octets: &[u8]) -> Asn1Result<String> {
        match self {
            StringKind::Utf8 => String::from_utf8(octets.to_vec())
                .map_err(|e| Asn1Error::MalformedInput(format!("invalid UTF8String: {}", e))),
            StringKind::Bmp => {
                if octets.len() % 2 != 0 {
                    return Err(Asn1Error::MalformedInput(
                        "BMPString contents not a multiple of 2 octets".to_string(),
                    ));
                }
                let units: Vec<u16> = octets
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| Asn1Error::MalformedInput(format!("invalid BMPString: {}", e)))
            }
            StringKind::Universal => {
                if octets.len() % 4 != 0 {
                    return Err(Asn1Error::MalformedInput(
                        "UniversalString contents not a multiple of 4 octets".to_string(),
                    ));
                }
                octets
                    .chunks_exact(4)
                    .map(|quad| {
                        let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
                        char::from_u32(code).ok_or_else(|| {
                            Asn1Error::MalformedInput(format!(
                                "invalid UniversalString code point 0x{:X}",
                                code
                            ))
                        })
                    })
                    .collect()
            }
            _ => Ok(octets.iter().map(|b| *b as char).collect()),
        }
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A character string value of any kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asn1String {
    kind: StringKind,
    contents: Box<[u8]>,
}

impl Asn1String {
    /// Encode `text` for `kind`
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `text` has a character outside the
    /// kind's character set.
    pub fn new(kind: StringKind, text: &str) -> Asn1Result<Self> {
        Ok(Self {
            kind,
            contents: kind.encode_text(text)?.into_boxed_slice(),
        })
    }

    /// Wrap raw contents octets (copied, not validated)
    pub fn from_octets(kind: StringKind, octets: &[u8]) -> Self {
        Self {
            kind,
            contents: octets.into(),
        }
    }

    pub(crate) fn adopt(kind: StringKind, contents: Vec<u8>) -> Self {
        Self {
            kind,
            contents: contents.into_boxed_slice(),
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn octets(&self) -> &[u8] {
        &self.contents
    }

    pub fn to_octets(&self) -> Vec<u8> {
        self.contents.to_vec()
    }

    /// Decode the contents to text
    pub fn get_string(&self) -> Asn1Result<String> {
        self.kind.decode_text(&self.contents)
    }

    pub(crate) fn encoding(&self) -> Encoding<'_> {
        Encoding::primitive(Tag::universal(false, self.kind.tag_number()), &self.contents[..])
    }
}

impl fmt::Display for Asn1String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_string() {
            Ok(text) => f.write_str(&text),
            Err(_) => {
                f.write_str("#")?;
                for b in self.contents.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Asn1Type for Asn1String {
    const TYPE_NAME: &'static str = "string";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::String(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        match value {
            Asn1Value::String(s) => Ok(s.clone()),
            other => Err(coercion_error(Self::TYPE_NAME, other)),
        }
    }
}

impl From<Asn1String> for Asn1Value {
    fn from(value: Asn1String) -> Self {
        Asn1Value::String(value)
    }
}

/// Typed wrapper around an [`Asn1String`] of one fixed kind
macro_rules! string_type {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Asn1String);

        impl $name {
            pub const KIND: StringKind = StringKind::$kind;

            pub fn new(text: &str) -> Asn1Result<Self> {
                Asn1String::new(Self::KIND, text).map($name)
            }

            pub fn from_octets(octets: &[u8]) -> Self {
                $name(Asn1String::from_octets(Self::KIND, octets))
            }

            pub fn get_string(&self) -> Asn1Result<String> {
                self.0.get_string()
            }

            pub fn octets(&self) -> &[u8] {
                self.0.octets()
            }

            pub fn as_asn1_string(&self) -> &Asn1String {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl Asn1Type for $name {
            const TYPE_NAME: &'static str = StringKind::$kind.name();

            fn is_instance(value: &Asn1Value) -> bool {
                matches!(value, Asn1Value::String(s) if s.kind() == StringKind::$kind)
            }

            fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
                match value {
                    Asn1Value::String(s) if s.kind() == StringKind::$kind => Ok($name(s.clone())),
                    other => Err(coercion_error(Self::TYPE_NAME, other)),
                }
            }
        }

        impl $crate::coerce::UniversalType for $name {
            const TAG_NUMBER: u32 = StringKind::$kind.tag_number();
        }

        impl From<$name> for Asn1Value {
            fn from(value: $name) -> Self {
                Asn1Value::String(value.0)
            }
        }

        impl From<$name> for Asn1String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_type!(
    /// UTF8String
    Utf8String, Utf8
);
string_type!(NumericString, Numeric);
string_type!(
    /// PrintableString: `A-Z a-z 0-9 space ' ( ) + , - . / : = ?`
    PrintableString, Printable
);
string_type!(
    /// T61String (TeletexString), read as one octet per character
    T61String, T61
);
string_type!(Ia5String, Ia5);
string_type!(
    /// UTCTime, e.g. `"250101120000Z"`
    UtcTime, UtcTime
);
string_type!(
    /// GeneralizedTime, e.g. `"20500101120000Z"`
    GeneralizedTime, GeneralizedTime
);
string_type!(GraphicString, Graphic);
string_type!(VisibleString, Visible);
string_type!(GeneralString, General);
string_type!(
    /// UniversalString (UTF-32BE)
    UniversalString, Universal
);
string_type!(
    /// BMPString (UTF-16BE)
    BmpString, Bmp
);
