//! Basic constraints and authority key identifier extensions
//!
//! ```text
//! BasicConstraints ::= SEQUENCE {
//!     cA                      BOOLEAN DEFAULT FALSE,
//!     pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
//!
//! AuthorityKeyIdentifier ::= SEQUENCE {
//!     keyIdentifier             [0] IMPLICIT OCTET STRING OPTIONAL,
//!     authorityCertIssuer       [1] IMPLICIT GeneralNames OPTIONAL,
//!     authorityCertSerialNumber [2] IMPLICIT INTEGER OPTIONAL }
//! ```

use crate::expect_sequence;
use asn1_codec::coerce::{Asn1Type, get_optional, get_tagged};
use asn1_codec::types::{Boolean, Integer, OctetString, Sequence, TaggedObject};
use asn1_codec::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};

/// The basicConstraints extension value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicConstraints {
    ca: bool,
    path_len_constraint: Option<Integer>,
}

impl BasicConstraints {
    /// End-entity constraints (`cA` FALSE)
    pub fn end_entity() -> Self {
        Self::default()
    }

    /// CA constraints with an optional path length limit
    pub fn ca(path_len_constraint: Option<u32>) -> Self {
        Self {
            ca: true,
            path_len_constraint: path_len_constraint.map(Integer::from),
        }
    }

    pub fn is_ca(&self) -> bool {
        self.ca
    }

    pub fn path_len_constraint(&self) -> Option<&Integer> {
        self.path_len_constraint.as_ref()
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        let mut cursor = seq.cursor();
        let ca = cursor
            .read_optional(get_optional::<Boolean>)?
            .is_some_and(|b| b.value());
        let path_len_constraint = cursor.read_optional(get_optional::<Integer>)?;
        cursor.finish()?;

        if path_len_constraint.as_ref().is_some_and(Integer::is_negative) {
            return Err(Asn1Error::MalformedInput(
                "negative pathLenConstraint".to_string(),
            ));
        }
        Ok(Self {
            ca,
            path_len_constraint,
        })
    }

    /// The SEQUENCE form; `cA` is omitted when false (DER DEFAULT)
    pub fn to_value(&self) -> Asn1Value {
        let mut elements: Vec<Asn1Value> = Vec::new();
        if self.ca {
            elements.push(Boolean::TRUE.into());
        }
        elements.extend(self.path_len_constraint.clone().map(Asn1Value::from));
        Sequence::new(elements).into()
    }
}

impl Asn1Type for BasicConstraints {
    const TYPE_NAME: &'static str = "BasicConstraints";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::Sequence(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        Self::from_sequence(expect_sequence(value, Self::TYPE_NAME)?)
    }
}

/// The authorityKeyIdentifier extension value
///
/// `authorityCertIssuer` is kept as the raw SEQUENCE of GeneralName values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorityKeyIdentifier {
    key_identifier: Option<OctetString>,
    authority_cert_issuer: Option<Sequence>,
    authority_cert_serial_number: Option<Integer>,
}

impl AuthorityKeyIdentifier {
    pub fn new(
        key_identifier: Option<OctetString>,
        authority_cert_issuer: Option<Sequence>,
        authority_cert_serial_number: Option<Integer>,
    ) -> Self {
        Self {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        }
    }

    pub fn key_identifier(&self) -> Option<&[u8]> {
        self.key_identifier.as_ref().map(OctetString::octets)
    }

    pub fn authority_cert_issuer(&self) -> Option<&Sequence> {
        self.authority_cert_issuer.as_ref()
    }

    pub fn authority_cert_serial_number(&self) -> Option<&Integer> {
        self.authority_cert_serial_number.as_ref()
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        let mut cursor = seq.cursor();
        let key_identifier =
            cursor.read_optional_context_tagged(0, |t| get_tagged::<OctetString>(t, false))?;
        let authority_cert_issuer =
            cursor.read_optional_context_tagged(1, |t| get_tagged::<Sequence>(t, false))?;
        let authority_cert_serial_number =
            cursor.read_optional_context_tagged(2, |t| get_tagged::<Integer>(t, false))?;
        cursor.finish()?;

        Ok(Self {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        })
    }

    pub fn to_value(&self) -> Asn1Value {
        let mut elements: Vec<Asn1Value> = Vec::new();
        if let Some(key_id) = &self.key_identifier {
            elements.push(TaggedObject::context_implicit(0, key_id.clone().into()).into());
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            elements.push(TaggedObject::context_implicit(1, issuer.clone().into()).into());
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            elements.push(TaggedObject::context_implicit(2, serial.clone().into()).into());
        }
        Sequence::new(elements).into()
    }
}

impl Asn1Type for AuthorityKeyIdentifier {
    const TYPE_NAME: &'static str = "AuthorityKeyIdentifier";

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
    use asn1_codec::coerce::{Asn1Input, get_instance};
    use hex_literal::hex;

    #[test]
    fn test_basic_constraints_forms() {
        let ca: BasicConstraints =
            get_instance(Asn1Input::Bytes(&hex!("30 06 01 01 FF 02 01 00"))).unwrap();
        assert!(ca.is_ca());
        assert_eq!(ca.path_len_constraint().and_then(Integer::to_i64), Some(0));

        let end_entity: BasicConstraints = get_instance(Asn1Input::Bytes(&hex!("30 00"))).unwrap();
        assert_eq!(end_entity, BasicConstraints::end_entity());

        // cA absent, pathLenConstraint present
        let path_only: BasicConstraints =
            get_instance(Asn1Input::Bytes(&hex!("30 03 02 01 02"))).unwrap();
        assert!(!path_only.is_ca());
        assert!(path_only.path_len_constraint().is_some());
    }

    #[test]
    fn test_basic_constraints_encoding() {
        assert_eq!(
            BasicConstraints::ca(Some(1)).to_value().to_der(),
            hex!("30 06 01 01 FF 02 01 01").to_vec()
        );
        assert_eq!(BasicConstraints::end_entity().to_value().to_der(), hex!("30 00").to_vec());
    }

    #[test]
    fn test_basic_constraints_rejects() {
        assert!(get_instance::<BasicConstraints>(Asn1Input::Bytes(&hex!("30 03 02 01 FF")))
            .unwrap_err()
            .is_malformed());
        // unknown trailing element
        assert!(get_instance::<BasicConstraints>(Asn1Input::Bytes(&hex!("30 02 05 00")))
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_authority_key_identifier() {
        let bytes = hex!("30 0D 80 04 01 02 03 04 A1 05 82 03 61 62 63");
        let aki: AuthorityKeyIdentifier = get_instance(Asn1Input::Bytes(&bytes)).unwrap();
        assert_eq!(aki.key_identifier(), Some(&hex!("01 02 03 04")[..]));
        assert_eq!(aki.authority_cert_issuer().map(Sequence::len), Some(1));
        assert!(aki.authority_cert_serial_number().is_none());
        assert_eq!(aki.to_value().to_der(), bytes.to_vec());
    }

    #[test]
    fn test_authority_key_identifier_serial_only() {
        let bytes = hex!("30 03 82 01 05");
        let aki: AuthorityKeyIdentifier = get_instance(Asn1Input::Bytes(&bytes)).unwrap();
        assert!(aki.key_identifier().is_none());
        assert_eq!(aki.authority_cert_serial_number().and_then(Integer::to_i64), Some(5));

        let built = AuthorityKeyIdentifier::new(None, None, Some(Integer::from_i64(5)));
        assert_eq!(built.to_value().to_der(), bytes.to_vec());
    }

    #[test]
    fn test_authority_key_identifier_out_of_order() {
        let err = get_instance::<AuthorityKeyIdentifier>(Asn1Input::Bytes(&hex!(
            "30 07 82 01 05 80 02 AA BB"
        )))
        .unwrap_err();
        assert!(err.is_malformed());
    }
}
