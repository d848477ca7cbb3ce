//! Tag identifier octets
//!
//! A tag identifies the type of an ASN.1 value. It consists of:
//! - **Class**: Universal, Application, Context-specific, or Private
//! - **Constructed/Primitive**: Whether the content holds nested TLV units
//! - **Tag Number**: 0-30 in the first octet, or a base-128 continuation
//!
//! # Encoding Format
//!
//! Low tag number form (tag number 0-30):
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//!
//! High tag number form (tag number >= 31):
//! ```text
//! First byte:      C C P 1 1 1 1 1  (all tag bits set to 1)
//! Following bytes: 1 T T T T T T T  (continuation bytes, last byte has bit 8 = 0)
//! ```
//!
//! Class and number together select an interpretation, never the number alone:
//! `[UNIVERSAL 4]` is an OCTET STRING while `[CONTEXT 4]` means whatever the
//! enclosing schema says it means.

use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use bytes::BufMut;
use log::warn;
use std::fmt;

/// Universal class tag numbers (ITU-T X.680 §8.4)
pub mod universal {
    pub const END_OF_CONTENTS: u32 = 0x00;
    pub const BOOLEAN: u32 = 0x01;
    pub const INTEGER: u32 = 0x02;
    pub const BIT_STRING: u32 = 0x03;
    pub const OCTET_STRING: u32 = 0x04;
    pub const NULL: u32 = 0x05;
    pub const OBJECT_IDENTIFIER: u32 = 0x06;
    pub const ENUMERATED: u32 = 0x0A;
    pub const UTF8_STRING: u32 = 0x0C;
    pub const SEQUENCE: u32 = 0x10;
    pub const SET: u32 = 0x11;
    pub const NUMERIC_STRING: u32 = 0x12;
    pub const PRINTABLE_STRING: u32 = 0x13;
    pub const T61_STRING: u32 = 0x14;
    pub const IA5_STRING: u32 = 0x16;
    pub const UTC_TIME: u32 = 0x17;
    pub const GENERALIZED_TIME: u32 = 0x18;
    pub const GRAPHIC_STRING: u32 = 0x19;
    pub const VISIBLE_STRING: u32 = 0x1A;
    pub const GENERAL_STRING: u32 = 0x1B;
    pub const UNIVERSAL_STRING: u32 = 0x1C;
    pub const BMP_STRING: u32 = 0x1E;
}

/// Raw class values as they appear in bits 8-7 of the identifier octet
pub mod class_bits {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const PRIVATE: u8 = 0xC0;
}

const CONSTRUCTED_BIT: u8 = 0x20;
const LOW_TAG_MASK: u8 = 0x1F;

/// Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from an identifier octet (bits 8-7)
    pub fn from_bits(octet: u8) -> Self {
        match (octet >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to its identifier octet bits
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }

    /// Map a raw class value (`0x00`, `0x40`, `0x80`, `0xC0`) to a class
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            class_bits::UNIVERSAL => Some(TagClass::Universal),
            class_bits::APPLICATION => Some(TagClass::Application),
            class_bits::CONTEXT_SPECIFIC => Some(TagClass::ContextSpecific),
            class_bits::PRIVATE => Some(TagClass::Private),
            _ => None,
        }
    }

    /// Upper-case class name used in diagnostics
    pub fn text(self) -> &'static str {
        match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT",
            TagClass::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Render a raw class value: "CONTEXT", "UNIVERSAL", ... or "UNKNOWN(n)"
pub fn tag_class_text(raw_class: u8) -> String {
    match TagClass::from_raw(raw_class) {
        Some(class) => class.text().to_string(),
        None => format!("UNKNOWN({})", raw_class),
    }
}

/// Render a raw class value and tag number: "[CONTEXT 3]", "[UNKNOWN(5) 2]"
pub fn tag_text(raw_class: u8, number: u32) -> String {
    format!("[{} {}]", tag_class_text(raw_class), number)
}

/// Tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u32,
}

impl Tag {
    /// Create a new tag
    pub fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, number)
    }

    /// Create a Private class tag
    pub fn private(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Private, constructed, number)
    }

    /// Get tag class
    pub fn class(&self) -> TagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Same class and number, ignoring the constructed bit
    pub fn has_tag(&self, class: TagClass, number: u32) -> bool {
        self.class == class && self.number == number
    }

    /// Is this the given universal tag?
    pub fn is_universal(&self, number: u32) -> bool {
        self.has_tag(TagClass::Universal, number)
    }

    /// Copy of this tag with the constructed bit replaced
    pub fn with_constructed(self, constructed: bool) -> Self {
        Self {
            constructed,
            ..self
        }
    }

    /// Number of identifier octets this tag needs
    pub fn encoded_len(&self) -> usize {
        if self.number < 31 {
            1
        } else {
            let bits = 32 - self.number.leading_zeros() as usize;
            1 + bits.div_ceil(7)
        }
    }

    /// Write the identifier octets
    pub fn write_to<B: BufMut>(&self, out: &mut B) {
        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { CONSTRUCTED_BIT } else { 0x00 };

        if self.number < 31 {
            out.put_u8(class_bits | constructed_bit | self.number as u8);
            return;
        }

        out.put_u8(class_bits | constructed_bit | LOW_TAG_MASK);

        let continuation = self.encoded_len() - 1;
        for i in (0..continuation).rev() {
            let group = ((self.number >> (i * 7)) & 0x7F) as u8;
            if i == 0 {
                out.put_u8(group);
            } else {
                out.put_u8(group | 0x80);
            }
        }
    }

    /// Encode tag to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut result);
        result
    }

    /// Decode tag from bytes
    ///
    /// # Returns
    /// Returns `Ok((Tag, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns `MalformedInput` if:
    /// - Buffer is too short
    /// - The high tag number form starts with a zero group (non-minimal)
    /// - The high tag number form carries a number below 31 and the rule
    ///   requires minimal encodings (DER)
    /// - The tag number does not fit in 32 bits
    pub fn decode(data: &[u8], rule: EncodingRule) -> Asn1Result<(Self, usize)> {
        let first_byte = *data.first().ok_or_else(|| {
            Asn1Error::MalformedInput("truncated input: missing identifier octet".to_string())
        })?;

        let class = TagClass::from_bits(first_byte);
        let constructed = (first_byte & CONSTRUCTED_BIT) != 0;
        let tag_bits = first_byte & LOW_TAG_MASK;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut number = 0u32;
        let mut pos = 1;
        loop {
            let byte = *data.get(pos).ok_or_else(|| {
                Asn1Error::MalformedInput("truncated input: incomplete high tag number".to_string())
            })?;

            if pos == 1 && byte == 0x80 {
                return Err(Asn1Error::MalformedInput(
                    "invalid high tag number: leading zero group".to_string(),
                ));
            }
            if number > (u32::MAX >> 7) {
                return Err(Asn1Error::MalformedInput(
                    "high tag number does not fit in 32 bits".to_string(),
                ));
            }

            number = (number << 7) | (byte & 0x7F) as u32;
            pos += 1;

            if byte & 0x80 == 0 {
                break;
            }
        }

        if number < 31 {
            if rule.requires_minimal_length() {
                return Err(Asn1Error::MalformedInput(format!(
                    "high tag number form used for {} under {}",
                    tag_text(class.to_bits(), number),
                    rule
                )));
            }
            warn!(
                "accepting high tag number form for {} under {}",
                tag_text(class.to_bits(), number),
                rule
            );
        }

        Ok((Self::new(class, constructed, number), pos))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.class.text(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_short_form() {
        let tag = Tag::universal(false, universal::INTEGER);
        let encoded = tag.encode();
        assert_eq!(encoded, vec![0x02]);
        assert_eq!(tag.encoded_len(), 1);
    }

    #[test]
    fn test_tag_constructed() {
        let tag = Tag::context_specific(true, 3);
        assert_eq!(tag.encode(), vec![0xA3]);
    }

    #[test]
    fn test_tag_high_number_round_trip() {
        for number in [31u32, 127, 128, 16383, 16384, 0x0FFF_FFFF, u32::MAX] {
            for class in [
                TagClass::Universal,
                TagClass::Application,
                TagClass::ContextSpecific,
                TagClass::Private,
            ] {
                for constructed in [false, true] {
                    let tag = Tag::new(class, constructed, number);
                    let encoded = tag.encode();
                    assert_eq!(encoded.len(), tag.encoded_len());
                    let (decoded, consumed) = Tag::decode(&encoded, EncodingRule::Der).unwrap();
                    assert_eq!(decoded, tag);
                    assert_eq!(consumed, encoded.len());
                }
            }
        }
    }

    #[test]
    fn test_tag_high_number_bytes() {
        // [APPLICATION 201] -> 5F 81 49
        let tag = Tag::application(false, 201);
        assert_eq!(tag.encode(), vec![0x5F, 0x81, 0x49]);
    }

    #[test]
    fn test_tag_decode_rejects_leading_zero_group() {
        let result = Tag::decode(&[0x9F, 0x80, 0x01], EncodingRule::Ber);
        assert!(matches!(result, Err(Asn1Error::MalformedInput(_))));
    }

    #[test]
    fn test_tag_decode_low_number_in_high_form() {
        // [UNIVERSAL 5] written as 1F 05
        let result = Tag::decode(&[0x1F, 0x05], EncodingRule::Der);
        assert!(matches!(result, Err(Asn1Error::MalformedInput(_))));

        let (tag, consumed) = Tag::decode(&[0x1F, 0x05], EncodingRule::Ber).unwrap();
        assert_eq!(tag, Tag::universal(false, 5));
        assert_eq!(consumed, 2);

        // 31 is the first number that needs the high form
        let (tag, _) = Tag::decode(&[0x9F, 0x1F], EncodingRule::Der).unwrap();
        assert_eq!(tag, Tag::context_specific(false, 31));
    }

    #[test]
    fn test_tag_decode_truncated() {
        assert!(Tag::decode(&[], EncodingRule::Ber).is_err());
        assert!(Tag::decode(&[0x1F, 0x81], EncodingRule::Ber).is_err());
    }

    #[test]
    fn test_tag_decode_overflow() {
        let result = Tag::decode(&[0x1F, 0x90, 0x80, 0x80, 0x80, 0x80, 0x00], EncodingRule::Ber);
        assert!(matches!(result, Err(Asn1Error::MalformedInput(_))));
    }

    #[test]
    fn test_tag_text() {
        assert_eq!(Tag::context_specific(true, 3).to_string(), "[CONTEXT 3]");
        assert_eq!(Tag::universal(false, 4).to_string(), "[UNIVERSAL 4]");
        assert_eq!(tag_text(class_bits::APPLICATION, 7), "[APPLICATION 7]");
        assert_eq!(tag_text(5, 2), "[UNKNOWN(5) 2]");
        assert_eq!(tag_class_text(class_bits::PRIVATE), "PRIVATE");
    }
}
