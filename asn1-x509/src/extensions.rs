//! Certificate and CRL extensions
//!
//! ```text
//! Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension
//!
//! Extension  ::= SEQUENCE {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING }
//! ```
//!
//! An empty extension block is accepted on input since such blocks occur in
//! the wild. An extension id may appear only once; a repeat is a
//! `DuplicateField` error at construction time.

use crate::expect_sequence;
use asn1_codec::coerce::{Asn1Input, Asn1Type, get_instance, get_optional, get_tagged};
use asn1_codec::types::{Boolean, ObjectIdentifier, OctetString, Sequence, TaggedObject};
use asn1_codec::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `id-ce` (2.5.29) arc below 128
macro_rules! id_ce {
    ($arc:literal) => {
        Lazy::new(|| ObjectIdentifier::from_static(&[0x55, 0x1D, $arc]))
    };
}

/// `id-pe` (1.3.6.1.5.5.7.1) arc below 128
macro_rules! id_pe {
    ($arc:literal) => {
        Lazy::new(|| ObjectIdentifier::from_static(&[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x01, $arc]))
    };
}

pub static SUBJECT_DIRECTORY_ATTRIBUTES: Lazy<ObjectIdentifier> = id_ce!(9);
pub static SUBJECT_KEY_IDENTIFIER: Lazy<ObjectIdentifier> = id_ce!(14);
pub static KEY_USAGE: Lazy<ObjectIdentifier> = id_ce!(15);
pub static PRIVATE_KEY_USAGE_PERIOD: Lazy<ObjectIdentifier> = id_ce!(16);
pub static SUBJECT_ALTERNATIVE_NAME: Lazy<ObjectIdentifier> = id_ce!(17);
pub static ISSUER_ALTERNATIVE_NAME: Lazy<ObjectIdentifier> = id_ce!(18);
pub static BASIC_CONSTRAINTS: Lazy<ObjectIdentifier> = id_ce!(19);
pub static CRL_NUMBER: Lazy<ObjectIdentifier> = id_ce!(20);
pub static REASON_CODE: Lazy<ObjectIdentifier> = id_ce!(21);
pub static INVALIDITY_DATE: Lazy<ObjectIdentifier> = id_ce!(24);
pub static DELTA_CRL_INDICATOR: Lazy<ObjectIdentifier> = id_ce!(27);
pub static ISSUING_DISTRIBUTION_POINT: Lazy<ObjectIdentifier> = id_ce!(28);
pub static CERTIFICATE_ISSUER: Lazy<ObjectIdentifier> = id_ce!(29);
pub static NAME_CONSTRAINTS: Lazy<ObjectIdentifier> = id_ce!(30);
pub static CRL_DISTRIBUTION_POINTS: Lazy<ObjectIdentifier> = id_ce!(31);
pub static CERTIFICATE_POLICIES: Lazy<ObjectIdentifier> = id_ce!(32);
pub static POLICY_MAPPINGS: Lazy<ObjectIdentifier> = id_ce!(33);
pub static AUTHORITY_KEY_IDENTIFIER: Lazy<ObjectIdentifier> = id_ce!(35);
pub static POLICY_CONSTRAINTS: Lazy<ObjectIdentifier> = id_ce!(36);
pub static EXTENDED_KEY_USAGE: Lazy<ObjectIdentifier> = id_ce!(37);
pub static FRESHEST_CRL: Lazy<ObjectIdentifier> = id_ce!(46);
pub static INHIBIT_ANY_POLICY: Lazy<ObjectIdentifier> = id_ce!(54);
pub static AUTHORITY_INFO_ACCESS: Lazy<ObjectIdentifier> = id_pe!(1);
pub static SUBJECT_INFO_ACCESS: Lazy<ObjectIdentifier> = id_pe!(11);

/// A single extension
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    /// `value` is the DER encoding of the extension's own structure
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self { id, critical, value }
    }

    pub fn id(&self) -> &ObjectIdentifier {
        &self.id
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// The `extnValue` octets, still encoded
    pub fn value(&self) -> &OctetString {
        &self.value
    }

    /// Decode the `extnValue` octets
    pub fn parsed_value(&self) -> Asn1Result<Asn1Value> {
        asn1_codec::decode(self.value.octets()).map_err(|e| {
            debug!("extension {} does not hold a valid encoding", self.id);
            Asn1Error::MalformedInput(format!("can't convert extension {}: {}", self.id, e))
        })
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        if seq.len() < 2 || seq.len() > 3 {
            return Err(Asn1Error::MalformedInput(format!(
                "Bad sequence size: {}",
                seq.len()
            )));
        }

        let mut cursor = seq.cursor();
        let id: ObjectIdentifier = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
        let critical = cursor
            .read_optional(get_optional::<Boolean>)?
            .is_some_and(|b| b.value());
        let value: OctetString = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
        cursor.finish()?;

        Ok(Self { id, critical, value })
    }

    /// The SEQUENCE form; `critical` is omitted when false (DER DEFAULT)
    pub fn to_value(&self) -> Asn1Value {
        let mut elements: Vec<Asn1Value> = vec![self.id.clone().into()];
        if self.critical {
            elements.push(Boolean::TRUE.into());
        }
        elements.push(self.value.clone().into());
        Sequence::new(elements).into()
    }
}

impl Asn1Type for Extension {
    const TYPE_NAME: &'static str = "Extension";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::Sequence(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        Self::from_sequence(expect_sequence(value, Self::TYPE_NAME)?)
    }
}

/// An ordered set of extensions keyed by id
#[derive(Debug, Clone, Default)]
pub struct Extensions {
    ordering: Vec<ObjectIdentifier>,
    extensions: HashMap<ObjectIdentifier, Extension>,
}

impl Extensions {
    /// Build from extensions in encoding order
    ///
    /// # Errors
    /// Returns `DuplicateField` if two extensions share an id.
    pub fn new(extensions: impl IntoIterator<Item = Extension>) -> Asn1Result<Self> {
        let mut result = Self::default();
        for extension in extensions {
            result.insert(extension)?;
        }
        Ok(result)
    }

    fn insert(&mut self, extension: Extension) -> Asn1Result<()> {
        if self.extensions.contains_key(&extension.id) {
            debug!("repeated extension {}", extension.id);
            return Err(Asn1Error::DuplicateField(format!(
                "repeated extension found: {}",
                extension.id
            )));
        }
        self.ordering.push(extension.id.clone());
        self.extensions.insert(extension.id.clone(), extension);
        Ok(())
    }

    /// Read an extension block from a tagged field, such as the
    /// `[3] EXPLICIT Extensions` of a TBSCertificate
    pub fn get_tagged(tagged: &TaggedObject, declared_explicit: bool) -> Asn1Result<Self> {
        let seq: Sequence = get_tagged(tagged, declared_explicit)?;
        Self::from_sequence(&seq)
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        let mut result = Self::default();
        for element in seq {
            result.insert(get_instance(Asn1Input::Value(element))?)?;
        }
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.ordering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }

    /// Extensions in encoding order
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.ordering.iter().filter_map(|oid| self.extensions.get(oid))
    }

    pub fn get_extension(&self, oid: &ObjectIdentifier) -> Option<&Extension> {
        self.extensions.get(oid)
    }

    /// Raw `extnValue` of extension `oid`
    pub fn get_extension_value(&self, oid: &ObjectIdentifier) -> Option<&OctetString> {
        self.get_extension(oid).map(Extension::value)
    }

    /// Decoded `extnValue` of extension `oid`, `None` if absent
    pub fn get_extension_parsed_value(&self, oid: &ObjectIdentifier) -> Asn1Result<Option<Asn1Value>> {
        self.get_extension(oid).map(Extension::parsed_value).transpose()
    }

    /// Extension ids in encoding order
    pub fn oids(&self) -> &[ObjectIdentifier] {
        &self.ordering
    }

    pub fn critical_oids(&self) -> Vec<ObjectIdentifier> {
        self.oids_where(true)
    }

    pub fn non_critical_oids(&self) -> Vec<ObjectIdentifier> {
        self.oids_where(false)
    }

    fn oids_where(&self, critical: bool) -> Vec<ObjectIdentifier> {
        self.iter()
            .filter(|ext| ext.critical == critical)
            .map(|ext| ext.id.clone())
            .collect()
    }

    pub fn has_any_critical_extensions(&self) -> bool {
        self.iter().any(Extension::is_critical)
    }

    /// Same extensions, regardless of order
    pub fn equivalent(&self, other: &Extensions) -> bool {
        self.extensions == other.extensions
    }

    pub fn to_value(&self) -> Asn1Value {
        Sequence::new(self.iter().map(Extension::to_value).collect()).into()
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.to_value().to_bytes(EncodingRule::Der)
    }
}

impl Asn1Type for Extensions {
    const TYPE_NAME: &'static str = "Extensions";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::Sequence(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        Self::from_sequence(expect_sequence(value, Self::TYPE_NAME)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::BasicConstraints;
    use hex_literal::hex;

    // basicConstraints, critical, cA TRUE
    const BASIC_CONSTRAINTS_EXT: [u8; 17] =
        hex!("30 0F 06 03 55 1D 13 01 01 FF 04 05 30 03 01 01 FF");
    // keyUsage, digitalSignature | keyEncipherment
    const KEY_USAGE_EXT: [u8; 13] = hex!("30 0B 06 03 55 1D 0F 04 04 03 02 05 A0");

    fn block(parts: &[&[u8]]) -> Vec<u8> {
        let body: Vec<u8> = parts.concat();
        let mut out = vec![0x30, body.len() as u8];
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn test_parse_extensions() {
        let bytes = block(&[&BASIC_CONSTRAINTS_EXT[..], &KEY_USAGE_EXT[..]]);
        let exts: Extensions = get_instance(Asn1Input::Bytes(&bytes)).unwrap();

        assert_eq!(exts.len(), 2);
        assert_eq!(exts.oids(), &[BASIC_CONSTRAINTS.clone(), KEY_USAGE.clone()]);
        assert_eq!(exts.critical_oids(), vec![BASIC_CONSTRAINTS.clone()]);
        assert_eq!(exts.non_critical_oids(), vec![KEY_USAGE.clone()]);
        assert!(exts.has_any_critical_extensions());

        let key_usage = exts.get_extension(&KEY_USAGE).unwrap();
        assert!(!key_usage.is_critical());
        assert_eq!(key_usage.value().octets(), &hex!("03 02 05 A0"));
        assert!(exts.get_extension(&SUBJECT_KEY_IDENTIFIER).is_none());
    }

    #[test]
    fn test_der_round_trip() {
        let bytes = block(&[&BASIC_CONSTRAINTS_EXT[..], &KEY_USAGE_EXT[..]]);
        let exts: Extensions = get_instance(Asn1Input::Bytes(&bytes)).unwrap();
        assert_eq!(exts.to_der(), bytes);
    }

    #[test]
    fn test_repeated_extension() {
        let bytes = block(&[&BASIC_CONSTRAINTS_EXT[..], &BASIC_CONSTRAINTS_EXT[..]]);
        let err = get_instance::<Extensions>(Asn1Input::Bytes(&bytes)).unwrap_err();
        assert!(matches!(err, Asn1Error::DuplicateField(_)));
        assert_eq!(
            err.to_string(),
            "Duplicate field: repeated extension found: 2.5.29.19"
        );
    }

    #[test]
    fn test_parsed_value() {
        let exts: Extensions =
            get_instance(Asn1Input::Bytes(&block(&[&BASIC_CONSTRAINTS_EXT[..]]))).unwrap();
        let parsed = exts.get_extension_parsed_value(&BASIC_CONSTRAINTS).unwrap().unwrap();
        let bc: BasicConstraints = get_instance(Asn1Input::Value(&parsed)).unwrap();
        assert!(bc.is_ca());
        assert!(exts.get_extension_parsed_value(&KEY_USAGE).unwrap().is_none());
    }

    #[test]
    fn test_empty_block_accepted() {
        let exts: Extensions = get_instance(Asn1Input::Bytes(&hex!("30 00"))).unwrap();
        assert!(exts.is_empty());
        assert!(!exts.has_any_critical_extensions());
    }

    #[test]
    fn test_bad_extension_size() {
        let err = get_instance::<Extensions>(Asn1Input::Bytes(&hex!("30 07 30 05 06 03 55 1D 13")))
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_extension_value() {
        let exts: Extensions =
            get_instance(Asn1Input::Bytes(&block(&[&BASIC_CONSTRAINTS_EXT[..], &KEY_USAGE_EXT[..]]))).unwrap();
        assert_eq!(
            exts.get_extension_value(&KEY_USAGE),
            Some(&OctetString::new(&hex!("03 02 05 A0")))
        );
        assert!(exts.get_extension_value(&SUBJECT_KEY_IDENTIFIER).is_none());
    }

    #[test]
    fn test_tagged_extensions() {
        // [3] EXPLICIT Extensions
        let mut explicit_form = hex!("A3 13").to_vec();
        explicit_form.extend(block(&[&BASIC_CONSTRAINTS_EXT[..]]));
        let value = asn1_codec::decode(&explicit_form).unwrap();
        let tagged = value.as_tagged().unwrap();

        let exts = Extensions::get_tagged(tagged, true).unwrap();
        assert_eq!(exts.oids(), &[BASIC_CONSTRAINTS.clone()]);
        assert!(Extensions::get_tagged(tagged, false).is_err());

        // [3] IMPLICIT Extensions
        let mut implicit_form = hex!("A3 11").to_vec();
        implicit_form.extend_from_slice(&BASIC_CONSTRAINTS_EXT);
        let value = asn1_codec::decode(&implicit_form).unwrap();
        let exts = Extensions::get_tagged(value.as_tagged().unwrap(), false).unwrap();
        assert!(exts.has_any_critical_extensions());
    }

    #[test]
    fn test_well_known_extension_ids() {
        let id_ce = [
            (&*SUBJECT_DIRECTORY_ATTRIBUTES, 9),
            (&*SUBJECT_KEY_IDENTIFIER, 14),
            (&*KEY_USAGE, 15),
            (&*PRIVATE_KEY_USAGE_PERIOD, 16),
            (&*SUBJECT_ALTERNATIVE_NAME, 17),
            (&*ISSUER_ALTERNATIVE_NAME, 18),
            (&*BASIC_CONSTRAINTS, 19),
            (&*CRL_NUMBER, 20),
            (&*REASON_CODE, 21),
            (&*INVALIDITY_DATE, 24),
            (&*DELTA_CRL_INDICATOR, 27),
            (&*ISSUING_DISTRIBUTION_POINT, 28),
            (&*CERTIFICATE_ISSUER, 29),
            (&*NAME_CONSTRAINTS, 30),
            (&*CRL_DISTRIBUTION_POINTS, 31),
            (&*CERTIFICATE_POLICIES, 32),
            (&*POLICY_MAPPINGS, 33),
            (&*AUTHORITY_KEY_IDENTIFIER, 35),
            (&*POLICY_CONSTRAINTS, 36),
            (&*EXTENDED_KEY_USAGE, 37),
            (&*FRESHEST_CRL, 46),
            (&*INHIBIT_ANY_POLICY, 54),
        ];
        for (oid, arc) in id_ce {
            assert_eq!(oid.id(), format!("2.5.29.{}", arc));
        }
        assert_eq!(AUTHORITY_INFO_ACCESS.id(), "1.3.6.1.5.5.7.1.1");
        assert_eq!(SUBJECT_INFO_ACCESS.id(), "1.3.6.1.5.5.7.1.11");
    }

    #[test]
    fn test_equivalent_ignores_order() {
        let a: Extensions =
            get_instance(Asn1Input::Bytes(&block(&[&BASIC_CONSTRAINTS_EXT[..], &KEY_USAGE_EXT[..]]))).unwrap();
        let b: Extensions =
            get_instance(Asn1Input::Bytes(&block(&[&KEY_USAGE_EXT[..], &BASIC_CONSTRAINTS_EXT[..]]))).unwrap();
        assert!(a.equivalent(&b));
        assert_ne!(a.to_der(), b.to_der());
    }

    #[test]
    fn test_build_and_encode() {
        let ext = Extension::new(
            SUBJECT_KEY_IDENTIFIER.clone(),
            false,
            OctetString::new(&hex!("04 02 AB CD")),
        );
        let exts = Extensions::new([ext.clone()]).unwrap();
        assert_eq!(
            exts.to_der(),
            hex!("30 0D 30 0B 06 03 55 1D 0E 04 04 04 02 AB CD").to_vec()
        );
        assert!(Extensions::new([ext.clone(), ext]).is_err());
        assert_eq!(AUTHORITY_INFO_ACCESS.id(), "1.3.6.1.5.5.7.1.1");
    }
}
