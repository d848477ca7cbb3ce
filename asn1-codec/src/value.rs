//! The generic value model
//!
//! [`Asn1Value`] is what the decoder produces and the encoder consumes. Every
//! variant wraps a concrete value type from [`crate::types`]; a universal tag
//! with no registered type decodes to [`UnknownValue`] so that unfamiliar
//! input still round-trips.

use crate::coerce::Asn1Type;
use crate::encoding::Encoding;
use crate::tag::{Tag, TagClass};
use crate::types::{
    Asn1String, BitString, Boolean, Enumerated, Integer, Null, ObjectIdentifier, OctetString,
    Sequence, Set, TaggedObject,
};
use asn1_core::{Asn1Result, EncodingRule};
use bytes::BytesMut;
use std::fmt;

/// Any decoded or constructed value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asn1Value {
    Boolean(Boolean),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null(Null),
    ObjectIdentifier(ObjectIdentifier),
    Enumerated(Enumerated),
    String(Asn1String),
    Sequence(Sequence),
    Set(Set),
    Tagged(TaggedObject),
    Unknown(UnknownValue),
}

impl Asn1Value {
    /// Tag this value is written with
    pub fn tag(&self) -> Tag {
        use crate::tag::universal as u;
        match self {
            Asn1Value::Boolean(_) => Tag::universal(false, u::BOOLEAN),
            Asn1Value::Integer(_) => Tag::universal(false, u::INTEGER),
            Asn1Value::BitString(_) => Tag::universal(false, u::BIT_STRING),
            Asn1Value::OctetString(_) => Tag::universal(false, u::OCTET_STRING),
            Asn1Value::Null(_) => Tag::universal(false, u::NULL),
            Asn1Value::ObjectIdentifier(_) => Tag::universal(false, u::OBJECT_IDENTIFIER),
            Asn1Value::Enumerated(_) => Tag::universal(false, u::ENUMERATED),
            Asn1Value::String(s) => Tag::universal(false, s.kind().tag_number()),
            Asn1Value::Sequence(_) => Tag::universal(true, u::SEQUENCE),
            Asn1Value::Set(_) => Tag::universal(true, u::SET),
            Asn1Value::Tagged(t) => t.tag(),
            Asn1Value::Unknown(v) => v.tag,
        }
    }

    /// Type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Asn1Value::Boolean(_) => "BOOLEAN",
            Asn1Value::Integer(_) => "INTEGER",
            Asn1Value::BitString(_) => "BIT STRING",
            Asn1Value::OctetString(_) => "OCTET STRING",
            Asn1Value::Null(_) => "NULL",
            Asn1Value::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Asn1Value::Enumerated(_) => "ENUMERATED",
            Asn1Value::String(s) => s.kind().name(),
            Asn1Value::Sequence(_) => "SEQUENCE",
            Asn1Value::Set(_) => "SET",
            Asn1Value::Tagged(_) => "tagged object",
            Asn1Value::Unknown(_) => "unknown",
        }
    }

    /// Encoded form under `rule`
    pub fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        match self {
            Asn1Value::Boolean(v) => v.encoding(),
            Asn1Value::Integer(v) => v.encoding(),
            Asn1Value::BitString(v) => v.encoding(rule),
            Asn1Value::OctetString(v) => v.encoding(),
            Asn1Value::Null(v) => v.encoding(),
            Asn1Value::ObjectIdentifier(v) => v.encoding(),
            Asn1Value::Enumerated(v) => v.encoding(),
            Asn1Value::String(v) => v.encoding(),
            Asn1Value::Sequence(v) => v.encoding(rule),
            Asn1Value::Set(v) => v.encoding(rule),
            Asn1Value::Tagged(v) => v.encoding(rule),
            Asn1Value::Unknown(v) => v.encoding(rule),
        }
    }

    /// Encoded form under `rule`, with the tag replaced (implicit tagging)
    pub fn encoding_implicit(&self, rule: EncodingRule, class: TagClass, number: u32) -> Encoding<'_> {
        self.encoding(rule).retag(class, number)
    }

    /// Total encoded length under `rule`
    pub fn encoded_len(&self, rule: EncodingRule) -> usize {
        self.encoding(rule).encoded_len()
    }

    /// Encode under `rule`
    pub fn to_bytes(&self, rule: EncodingRule) -> Vec<u8> {
        let encoding = self.encoding(rule);
        let mut buffer = BytesMut::with_capacity(encoding.encoded_len());
        encoding.write_to(&mut buffer);
        buffer.to_vec()
    }

    /// Encode under DER
    pub fn to_der(&self) -> Vec<u8> {
        self.to_bytes(EncodingRule::Der)
    }

    /// Decode one complete TLV unit (BER-permissive)
    pub fn from_bytes(bytes: &[u8]) -> Asn1Result<Self> {
        crate::decode(bytes)
    }

    pub fn as_tagged(&self) -> Option<&TaggedObject> {
        match self {
            Asn1Value::Tagged(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Asn1Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Asn1Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Asn1Value::Null(_))
    }
}

impl fmt::Display for Asn1Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asn1Value::Boolean(v) => fmt::Display::fmt(v, f),
            Asn1Value::Integer(v) => fmt::Display::fmt(v, f),
            Asn1Value::BitString(v) => fmt::Display::fmt(v, f),
            Asn1Value::OctetString(v) => fmt::Display::fmt(v, f),
            Asn1Value::Null(v) => fmt::Display::fmt(v, f),
            Asn1Value::ObjectIdentifier(v) => fmt::Display::fmt(v, f),
            Asn1Value::Enumerated(v) => fmt::Display::fmt(v, f),
            Asn1Value::String(v) => fmt::Display::fmt(v, f),
            Asn1Value::Sequence(v) => fmt::Display::fmt(v, f),
            Asn1Value::Set(v) => fmt::Display::fmt(v, f),
            Asn1Value::Tagged(v) => fmt::Display::fmt(v, f),
            Asn1Value::Unknown(v) => write!(f, "{}", v.tag),
        }
    }
}

impl Asn1Type for Asn1Value {
    const TYPE_NAME: &'static str = "ASN.1 object";

    fn is_instance(_value: &Asn1Value) -> bool {
        true
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        Ok(value.clone())
    }
}

/// Contents of a universal value with no registered type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnknownContent {
    Primitive(Box<[u8]>),
    Constructed(Vec<Asn1Value>),
}

/// Universal value with no registered type, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownValue {
    tag: Tag,
    content: UnknownContent,
}

impl UnknownValue {
    pub(crate) fn new(tag: Tag, content: UnknownContent) -> Self {
        let tag = tag.with_constructed(matches!(content, UnknownContent::Constructed(_)));
        Self { tag, content }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn content(&self) -> &UnknownContent {
        &self.content
    }

    fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        match &self.content {
            UnknownContent::Primitive(contents) => Encoding::primitive(self.tag, &contents[..]),
            UnknownContent::Constructed(elements) => Encoding::constructed(
                self.tag,
                elements.iter().map(|e| e.encoding(rule)).collect(),
                rule.allows_indefinite(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::universal;
    use crate::types::Utf8String;

    #[test]
    fn test_value_tags() {
        let s: Asn1Value = Utf8String::new("a").unwrap().into();
        assert_eq!(s.tag(), Tag::universal(false, universal::UTF8_STRING));
        assert_eq!(s.type_name(), "UTF8String");

        let seq: Asn1Value = Sequence::new(vec![]).into();
        assert!(seq.tag().is_constructed());
    }

    #[test]
    fn test_encoded_len_matches_bytes() {
        let value: Asn1Value = Sequence::new(vec![
            Integer::from_i64(300).into(),
            OctetString::new(&[0u8; 200]).into(),
        ])
        .into();
        for rule in [EncodingRule::Ber, EncodingRule::Der, EncodingRule::Dl] {
            assert_eq!(value.encoded_len(rule), value.to_bytes(rule).len());
        }
    }

    #[test]
    fn test_implicit_encoding() {
        let value: Asn1Value = OctetString::new(&[0xAA]).into();
        let bytes = value
            .encoding_implicit(EncodingRule::Der, TagClass::ContextSpecific, 0)
            .to_vec();
        assert_eq!(bytes, vec![0x80, 0x01, 0xAA]);
    }
}
