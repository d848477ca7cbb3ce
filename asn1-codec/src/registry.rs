//! Universal type registry
//!
//! Maps each supported universal tag number to the constructors that build a
//! value of that type from raw contents. The decoder uses it for every
//! universal TLV, and tagged objects use it to reinterpret implicitly tagged
//! contents.
//!
//! The table is built once on first use and never changes afterwards.

use crate::decoder::Decoder;
use crate::tag::{TagClass, tag_text, universal};
use crate::types::{
    Asn1String, BitString, Boolean, Enumerated, Integer, Null, ObjectIdentifier, OctetString,
    Sequence, Set, StringKind,
};
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Builds a value from primitive contents octets
pub type PrimitiveConstructor = fn(u32, Vec<u8>, EncodingRule) -> Asn1Result<Asn1Value>;

/// Builds a value from the elements of a constructed encoding
pub type ConstructedConstructor = fn(u32, Vec<Asn1Value>, EncodingRule) -> Asn1Result<Asn1Value>;

/// Registry entry for one universal type
#[derive(Debug)]
pub struct UniversalTypeEntry {
    pub name: &'static str,
    pub tag_number: u32,
    primitive: Option<PrimitiveConstructor>,
    constructed: Option<ConstructedConstructor>,
}

impl UniversalTypeEntry {
    /// Build from primitive contents octets; the buffer is adopted
    pub fn from_implicit_primitive(&self, contents: Vec<u8>, rule: EncodingRule) -> Asn1Result<Asn1Value> {
        match self.primitive {
            Some(build) => build(self.tag_number, contents, rule),
            None => {
                debug!("rejecting primitive encoding of {}", self.name);
                Err(Asn1Error::MalformedInput(format!(
                    "{} must use constructed encoding",
                    self.name
                )))
            }
        }
    }

    /// Build from the elements of a constructed encoding
    pub fn from_implicit_constructed(
        &self,
        elements: Vec<Asn1Value>,
        rule: EncodingRule,
    ) -> Asn1Result<Asn1Value> {
        match self.constructed {
            Some(build) => build(self.tag_number, elements, rule),
            None => {
                debug!("rejecting constructed encoding of {}", self.name);
                Err(Asn1Error::MalformedInput(format!(
                    "{} must use primitive encoding",
                    self.name
                )))
            }
        }
    }

    /// Decode one complete TLV unit and require this entry's tag
    pub fn from_byte_array(&self, bytes: &[u8]) -> Asn1Result<Asn1Value> {
        let value = Decoder::new(bytes).decode_complete()?;
        if !value.tag().is_universal(self.tag_number) {
            return Err(Asn1Error::tag_mismatch(
                tag_text(TagClass::Universal.to_bits(), self.tag_number),
                value.tag().to_string(),
            ));
        }
        Ok(value)
    }
}

/// Look up the entry for a universal tag number
pub fn lookup(tag_number: u32) -> Option<&'static UniversalTypeEntry> {
    REGISTRY.get(&tag_number)
}

/// Is there a registered type for this universal tag number?
pub fn is_registered(tag_number: u32) -> bool {
    REGISTRY.contains_key(&tag_number)
}

static REGISTRY: Lazy<HashMap<u32, UniversalTypeEntry>> = Lazy::new(|| {
    let mut entries = vec![
        primitive_only("BOOLEAN", universal::BOOLEAN, |_, c, rule| {
            Boolean::from_contents(&c, rule).map(Asn1Value::Boolean)
        }),
        primitive_only("INTEGER", universal::INTEGER, |_, c, _| {
            Integer::from_contents(c).map(Asn1Value::Integer)
        }),
        either_form(
            "BIT STRING",
            universal::BIT_STRING,
            |_, c, rule| BitString::from_contents(c, rule).map(Asn1Value::BitString),
            bit_string_segments,
        ),
        either_form(
            "OCTET STRING",
            universal::OCTET_STRING,
            |_, c, _| Ok(Asn1Value::OctetString(OctetString::adopt(c))),
            |number, elements, rule| {
                join_octet_segments(number, elements, rule)
                    .map(|octets| Asn1Value::OctetString(OctetString::adopt(octets)))
            },
        ),
        primitive_only("NULL", universal::NULL, |_, c, _| {
            Null::from_contents(&c).map(Asn1Value::Null)
        }),
        primitive_only("OBJECT IDENTIFIER", universal::OBJECT_IDENTIFIER, |_, c, _| {
            ObjectIdentifier::from_contents(c).map(Asn1Value::ObjectIdentifier)
        }),
        primitive_only("ENUMERATED", universal::ENUMERATED, |_, c, _| {
            Enumerated::from_contents(c).map(Asn1Value::Enumerated)
        }),
        constructed_only("SEQUENCE", universal::SEQUENCE, |_, elements, _| {
            Ok(Asn1Value::Sequence(Sequence::new(elements)))
        }),
        constructed_only("SET", universal::SET, |_, elements, _| {
            Ok(Asn1Value::Set(Set::new(elements)))
        }),
    ];

    entries.extend(StringKind::ALL.into_iter().map(|kind| {
        either_form(kind.name(), kind.tag_number(), string_primitive, string_segments)
    }));

    entries
        .into_iter()
        .map(|entry| (entry.tag_number, entry))
        .collect()
});

fn primitive_only(name: &'static str, tag_number: u32, build: PrimitiveConstructor) -> UniversalTypeEntry {
    UniversalTypeEntry {
        name,
        tag_number,
        primitive: Some(build),
        constructed: None,
    }
}

fn constructed_only(
    name: &'static str,
    tag_number: u32,
    build: ConstructedConstructor,
) -> UniversalTypeEntry {
    UniversalTypeEntry {
        name,
        tag_number,
        primitive: None,
        constructed: Some(build),
    }
}

/// Types whose BER encoding may be split into constructed segments
fn either_form(
    name: &'static str,
    tag_number: u32,
    primitive: PrimitiveConstructor,
    constructed: ConstructedConstructor,
) -> UniversalTypeEntry {
    UniversalTypeEntry {
        name,
        tag_number,
        primitive: Some(primitive),
        constructed: Some(constructed),
    }
}

fn string_kind(tag_number: u32) -> Asn1Result<StringKind> {
    StringKind::from_tag_number(tag_number).ok_or_else(|| {
        Asn1Error::SchemaContract(format!("tag number {} is not a string type", tag_number))
    })
}

fn string_primitive(tag_number: u32, contents: Vec<u8>, _rule: EncodingRule) -> Asn1Result<Asn1Value> {
    let kind = string_kind(tag_number)?;
    Ok(Asn1Value::String(Asn1String::adopt(kind, contents)))
}

fn string_segments(tag_number: u32, elements: Vec<Asn1Value>, rule: EncodingRule) -> Asn1Result<Asn1Value> {
    let kind = string_kind(tag_number)?;
    let octets = join_octet_segments(tag_number, elements, rule)?;
    Ok(Asn1Value::String(Asn1String::adopt(kind, octets)))
}

fn check_segments_allowed(tag_number: u32, rule: EncodingRule) -> Asn1Result<()> {
    if !rule.allows_constructed_strings() {
        debug!("rejecting constructed string encoding under {}", rule);
        return Err(Asn1Error::MalformedInput(format!(
            "constructed encoding of {} not allowed under {}",
            tag_text(TagClass::Universal.to_bits(), tag_number),
            rule
        )));
    }
    warn!(
        "joining constructed segments of {}",
        tag_text(TagClass::Universal.to_bits(), tag_number)
    );
    Ok(())
}

/// Concatenate OCTET STRING segments of a constructed string encoding
fn join_octet_segments(tag_number: u32, elements: Vec<Asn1Value>, rule: EncodingRule) -> Asn1Result<Vec<u8>> {
    check_segments_allowed(tag_number, rule)?;

    let mut octets = Vec::new();
    for element in elements {
        match element {
            Asn1Value::OctetString(segment) => octets.extend_from_slice(segment.octets()),
            other => {
                return Err(Asn1Error::MalformedInput(format!(
                    "unexpected {} segment in constructed string",
                    other.type_name()
                )));
            }
        }
    }
    Ok(octets)
}

fn bit_string_segments(tag_number: u32, elements: Vec<Asn1Value>, rule: EncodingRule) -> Asn1Result<Asn1Value> {
    check_segments_allowed(tag_number, rule)?;

    let segments = elements
        .into_iter()
        .map(|element| match element {
            Asn1Value::BitString(segment) => Ok(segment),
            other => Err(Asn1Error::MalformedInput(format!(
                "unexpected {} segment in constructed BIT STRING",
                other.type_name()
            ))),
        })
        .collect::<Asn1Result<Vec<BitString>>>()?;

    BitString::from_segments(&segments).map(Asn1Value::BitString)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        for number in [1u32, 2, 3, 4, 5, 6, 10, 12, 16, 17, 19, 20, 22, 23, 24, 30] {
            assert!(is_registered(number), "tag {} not registered", number);
        }
        assert!(!is_registered(universal::END_OF_CONTENTS));
        assert!(lookup(8).is_none());
    }

    #[test]
    fn test_wrong_form_is_malformed() {
        let seq = lookup(universal::SEQUENCE).unwrap();
        assert!(matches!(
            seq.from_implicit_primitive(vec![], EncodingRule::Ber),
            Err(Asn1Error::MalformedInput(_))
        ));

        let int = lookup(universal::INTEGER).unwrap();
        assert!(matches!(
            int.from_implicit_constructed(vec![], EncodingRule::Ber),
            Err(Asn1Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_constructed_octet_string_only_ber() {
        let entry = lookup(universal::OCTET_STRING).unwrap();
        let segments = vec![
            Asn1Value::OctetString(OctetString::new(&[1, 2])),
            Asn1Value::OctetString(OctetString::new(&[3])),
        ];

        let joined = entry
            .from_implicit_constructed(segments.clone(), EncodingRule::Ber)
            .unwrap();
        assert_eq!(joined, Asn1Value::OctetString(OctetString::new(&[1, 2, 3])));

        assert!(entry.from_implicit_constructed(segments.clone(), EncodingRule::Der).is_err());
        assert!(entry.from_implicit_constructed(segments, EncodingRule::Dl).is_err());
    }

    #[test]
    fn test_from_byte_array_checks_tag() {
        let entry = lookup(universal::INTEGER).unwrap();
        assert!(entry.from_byte_array(&[0x02, 0x01, 0x05]).is_ok());

        let err = entry.from_byte_array(&[0x04, 0x01, 0x05]).unwrap_err();
        assert_eq!(err.to_string(), "Expected [UNIVERSAL 2] tag but found [UNIVERSAL 4]");

        assert!(entry.from_byte_array(&[0x02, 0x01, 0x05, 0x00]).is_err());
    }
}
