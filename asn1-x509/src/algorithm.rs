//! Algorithm identifiers and public key info
//!
//! ```text
//! AlgorithmIdentifier  ::= SEQUENCE {
//!     algorithm            OBJECT IDENTIFIER,
//!     parameters           ANY DEFINED BY algorithm OPTIONAL }
//!
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING }
//! ```

use crate::expect_sequence;
use asn1_codec::coerce::{Asn1Input, Asn1Type, get_instance};
use asn1_codec::types::{BitString, ObjectIdentifier, Sequence};
use asn1_codec::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use once_cell::sync::Lazy;

pub static RSA_ENCRYPTION: Lazy<ObjectIdentifier> = Lazy::new(|| {
    ObjectIdentifier::from_static(&[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01])
});
pub static SHA256_WITH_RSA_ENCRYPTION: Lazy<ObjectIdentifier> = Lazy::new(|| {
    ObjectIdentifier::from_static(&[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B])
});
pub static EC_PUBLIC_KEY: Lazy<ObjectIdentifier> =
    Lazy::new(|| ObjectIdentifier::from_static(&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01]));
pub static ECDSA_WITH_SHA256: Lazy<ObjectIdentifier> =
    Lazy::new(|| ObjectIdentifier::from_static(&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02]));
pub static ID_ED25519: Lazy<ObjectIdentifier> =
    Lazy::new(|| ObjectIdentifier::from_static(&[0x2B, 0x65, 0x70]));
pub static ID_SHA256: Lazy<ObjectIdentifier> = Lazy::new(|| {
    ObjectIdentifier::from_static(&[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01])
});

/// An algorithm and its optional parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Option<Asn1Value>,
}

impl AlgorithmIdentifier {
    pub fn new(algorithm: ObjectIdentifier, parameters: Option<Asn1Value>) -> Self {
        Self {
            algorithm,
            parameters,
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    /// Parameters as decoded; an explicit NULL is kept as `Some(Null)`
    pub fn parameters(&self) -> Option<&Asn1Value> {
        self.parameters.as_ref()
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        let mut cursor = seq.cursor();
        let algorithm: ObjectIdentifier = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
        let parameters = cursor.read_optional(|v| Ok(Some(v.clone())))?;
        cursor.finish()?;
        Ok(Self {
            algorithm,
            parameters,
        })
    }

    pub fn to_value(&self) -> Asn1Value {
        let mut elements: Vec<Asn1Value> = vec![self.algorithm.clone().into()];
        elements.extend(self.parameters.clone());
        Sequence::new(elements).into()
    }
}

impl Asn1Type for AlgorithmIdentifier {
    const TYPE_NAME: &'static str = "AlgorithmIdentifier";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::Sequence(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        Self::from_sequence(expect_sequence(value, Self::TYPE_NAME)?)
    }
}

/// A public key with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, public_key: BitString) -> Self {
        Self {
            algorithm,
            public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn public_key(&self) -> &BitString {
        &self.public_key
    }

    /// Key octets; `MalformedInput` if the key is not a whole number of octets
    pub fn public_key_octets(&self) -> Asn1Result<&[u8]> {
        self.public_key.octets().ok_or_else(|| {
            Asn1Error::MalformedInput(format!(
                "public key has {} unused bits",
                self.public_key.pad_bits()
            ))
        })
    }

    /// Decode the key octets, for keys that are themselves ASN.1 (RSA)
    pub fn parse_public_key(&self) -> Asn1Result<Asn1Value> {
        asn1_codec::decode(self.public_key_octets()?)
    }

    fn from_sequence(seq: &Sequence) -> Asn1Result<Self> {
        let mut cursor = seq.cursor();
        let algorithm: AlgorithmIdentifier = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
        let public_key: BitString = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
        cursor.finish()?;
        Ok(Self {
            algorithm,
            public_key,
        })
    }

    pub fn to_value(&self) -> Asn1Value {
        Sequence::new(vec![self.algorithm.to_value(), self.public_key.clone().into()]).into()
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.to_value().to_bytes(EncodingRule::Der)
    }
}

impl Asn1Type for SubjectPublicKeyInfo {
    const TYPE_NAME: &'static str = "SubjectPublicKeyInfo";

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
    use asn1_codec::types::{Integer, Null};
    use hex_literal::hex;

    const RSA_KEY_INFO: [u8; 90] = hex!(
        "3058300b06092a864886f70d0101010349003046024100bac0c3261d8319b334ffedb345327fa0"
        "699a225892d53fc38346ebb50b68de01e429c4cfb939eecf68dd86372de7044e04398901e69309"
        "580d32f67d38157f0d020103"
    );

    #[test]
    fn test_rsa_key_info() {
        let info: SubjectPublicKeyInfo = get_instance(Asn1Input::Bytes(&RSA_KEY_INFO)).unwrap();
        assert_eq!(info.algorithm().algorithm(), &*RSA_ENCRYPTION);
        assert!(info.algorithm().parameters().is_none());
        assert_eq!(info.public_key().pad_bits(), 0);

        let key = info.parse_public_key().unwrap();
        let key = key.as_sequence().unwrap();
        assert_eq!(key.len(), 2);
        assert_eq!(key.get(1), Some(&Asn1Value::from(Integer::from_i64(3))));

        assert_eq!(info.to_der(), RSA_KEY_INFO.to_vec());
    }

    #[test]
    fn test_null_parameters_kept() {
        let bytes = hex!("30 0D 06 09 2A 86 48 86 F7 0D 01 01 0B 05 00");
        let alg: AlgorithmIdentifier = get_instance(Asn1Input::Bytes(&bytes)).unwrap();
        assert_eq!(alg.algorithm(), &*SHA256_WITH_RSA_ENCRYPTION);
        assert_eq!(alg.parameters(), Some(&Asn1Value::from(Null)));
        assert_eq!(alg.to_value().to_der(), bytes.to_vec());
    }

    #[test]
    fn test_extra_field_rejected() {
        let bytes = hex!("30 09 06 03 2B 65 70 05 00 05 00");
        let err = get_instance::<AlgorithmIdentifier>(Asn1Input::Bytes(&bytes)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_padded_key_not_octets() {
        let info = SubjectPublicKeyInfo::new(
            AlgorithmIdentifier::new(ID_ED25519.clone(), None),
            BitString::new(&[0xF0], 4).unwrap(),
        );
        assert!(info.public_key_octets().is_err());
        assert_eq!(ID_ED25519.id(), "1.3.101.112");
    }

    #[test]
    fn test_well_known_algorithm_ids() {
        let expected = [
            (&*RSA_ENCRYPTION, "1.2.840.113549.1.1.1"),
            (&*SHA256_WITH_RSA_ENCRYPTION, "1.2.840.113549.1.1.11"),
            (&*EC_PUBLIC_KEY, "1.2.840.10045.2.1"),
            (&*ECDSA_WITH_SHA256, "1.2.840.10045.4.3.2"),
            (&*ID_ED25519, "1.3.101.112"),
            (&*ID_SHA256, "2.16.840.1.101.3.4.2.1"),
        ];
        for (oid, text) in expected {
            assert_eq!(oid, &ObjectIdentifier::new(text).unwrap());
        }
    }

    #[test]
    fn test_not_a_sequence() {
        let err = get_instance::<AlgorithmIdentifier>(Asn1Input::Bytes(&hex!("05 00"))).unwrap_err();
        assert!(matches!(err, Asn1Error::TypeCoercion(_)));
    }
}
