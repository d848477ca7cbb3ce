//! OBJECT IDENTIFIER
//!
//! Stored as its encoded contents octets, which are canonical: two OIDs are
//! equal exactly when their contents are. The dotted text form is produced
//! on demand.

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use asn1_core::{Asn1Error, Asn1Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest arc value; nine base-128 groups
const MAX_ARC: u64 = (1 << 63) - 1;

/// OBJECT IDENTIFIER value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectIdentifier {
    contents: Box<[u8]>,
}

impl ObjectIdentifier {
    /// Parse dotted text such as `"2.5.29.19"`
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the text is not a valid identifier: fewer
    /// than two arcs, a first arc above 2, a second arc of 40 or more under
    /// first arc 0 or 1, or a non-numeric arc.
    pub fn new(text: &str) -> Asn1Result<Self> {
        let arcs = text
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    Asn1Error::InvalidArgument(format!("invalid OID arc '{}' in '{}'", part, text))
                })
            })
            .collect::<Asn1Result<Vec<u64>>>()?;
        Self::from_arcs(&arcs)
    }

    /// Build from numeric arcs
    pub fn from_arcs(arcs: &[u64]) -> Asn1Result<Self> {
        let [first, second, rest @ ..] = arcs else {
            return Err(Asn1Error::InvalidArgument(
                "OID needs at least two arcs".to_string(),
            ));
        };
        if *first > 2 {
            return Err(Asn1Error::InvalidArgument(format!(
                "first OID arc must be 0, 1 or 2, got {}",
                first
            )));
        }
        if *first < 2 && *second >= 40 {
            return Err(Asn1Error::InvalidArgument(format!(
                "second OID arc must be below 40 under arc {}, got {}",
                first, second
            )));
        }

        let head = first
            .checked_mul(40)
            .and_then(|v| v.checked_add(*second))
            .ok_or_else(|| Asn1Error::InvalidArgument("OID arc too large".to_string()))?;

        if head > MAX_ARC || rest.iter().any(|arc| *arc > MAX_ARC) {
            return Err(Asn1Error::InvalidArgument("OID arc exceeds 63 bits".to_string()));
        }

        let mut contents = Vec::new();
        write_base128(head, &mut contents);
        for arc in rest {
            write_base128(*arc, &mut contents);
        }
        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Wrap the contents octets of a registered identifier
    ///
    /// For compile-time literals such as `&[0x55, 0x1D, 0x13]` (2.5.29.19);
    /// the octets are trusted and only checked in debug builds.
    pub fn from_static(contents: &'static [u8]) -> Self {
        debug_assert!(
            check_contents(contents).is_ok(),
            "invalid OBJECT IDENTIFIER contents {:02X?}",
            contents
        );
        Self {
            contents: contents.into(),
        }
    }

    /// Adopt decoded contents octets
    pub(crate) fn from_contents(contents: Vec<u8>) -> Asn1Result<Self> {
        check_contents(&contents)?;
        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Numeric arcs, the first two split out of the leading subidentifier
    pub fn arcs(&self) -> Vec<u64> {
        let mut arcs = Vec::new();
        let mut value = 0u64;
        for b in self.contents.iter() {
            value = (value << 7) | (b & 0x7F) as u64;
            if b & 0x80 == 0 {
                if arcs.is_empty() {
                    let first = (value / 40).min(2);
                    arcs.push(first);
                    arcs.push(value - first * 40);
                } else {
                    arcs.push(value);
                }
                value = 0;
            }
        }
        arcs
    }

    /// Dotted text form
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Is `self` a strict descendant of `stem`?
    pub fn is_branch_of(&self, stem: &ObjectIdentifier) -> bool {
        self.contents.len() > stem.contents.len() && self.contents.starts_with(&stem.contents)
    }

    /// Append a single arc
    pub fn branch(&self, arc: u64) -> Asn1Result<Self> {
        if arc > MAX_ARC {
            return Err(Asn1Error::InvalidArgument("OID arc exceeds 63 bits".to_string()));
        }
        let mut contents = self.contents.to_vec();
        write_base128(arc, &mut contents);
        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Encoded contents octets
    pub fn as_bytes(&self) -> &[u8] {
        &self.contents
    }

    pub(crate) fn encoding(&self) -> Encoding<'_> {
        Encoding::primitive(
            Tag::universal(false, universal::OBJECT_IDENTIFIER),
            &self.contents[..],
        )
    }
}

/// Validate encoded contents: non-empty, complete final subidentifier, no
/// leading zero groups, every subidentifier within 63 bits
fn check_contents(contents: &[u8]) -> Asn1Result<()> {
    let Some(last) = contents.last() else {
        return Err(Asn1Error::MalformedInput(
            "empty OBJECT IDENTIFIER contents".to_string(),
        ));
    };
    if last & 0x80 != 0 {
        return Err(Asn1Error::MalformedInput(
            "truncated OBJECT IDENTIFIER subidentifier".to_string(),
        ));
    }

    let mut start_of_subidentifier = true;
    let mut digits = 0usize;
    for b in contents {
        if start_of_subidentifier && *b == 0x80 {
            return Err(Asn1Error::MalformedInput(
                "OBJECT IDENTIFIER subidentifier with leading zero group".to_string(),
            ));
        }
        digits += 1;
        if digits > 9 {
            return Err(Asn1Error::MalformedInput(
                "OBJECT IDENTIFIER subidentifier exceeds 63 bits".to_string(),
            ));
        }
        start_of_subidentifier = b & 0x80 == 0;
        if start_of_subidentifier {
            digits = 0;
        }
    }
    Ok(())
}

fn write_base128(value: u64, out: &mut Vec<u8>) {
    let bits = (64 - value.leading_zeros() as usize).max(1);
    let groups = bits.div_ceil(7);
    for i in (0..groups).rev() {
        let group = ((value >> (i * 7)) & 0x7F) as u8;
        out.push(if i == 0 { group } else { group | 0x80 });
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in self.arcs() {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Asn1Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectIdentifier {
    type Error = Asn1Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ObjectIdentifier> for String {
    fn from(oid: ObjectIdentifier) -> Self {
        oid.to_string()
    }
}

universal_type!(
    ObjectIdentifier,
    ObjectIdentifier,
    "OBJECT IDENTIFIER",
    universal::OBJECT_IDENTIFIER
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_from_string() {
        let oid = ObjectIdentifier::new("1.2.840.113549.1.1.1").unwrap();
        assert_eq!(
            oid.as_bytes(),
            &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01]
        );
        assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");
    }

    #[test]
    fn test_oid_large_first_subidentifier() {
        // 2.999 -> 40*2 + 999 = 1079 -> 0x88 0x37
        let oid = ObjectIdentifier::new("2.999.3").unwrap();
        assert_eq!(oid.as_bytes(), &[0x88, 0x37, 0x03]);
        assert_eq!(oid.arcs(), vec![2, 999, 3]);
    }

    #[test]
    fn test_oid_invalid_text() {
        assert!(ObjectIdentifier::new("1").is_err());
        assert!(ObjectIdentifier::new("3.1").is_err());
        assert!(ObjectIdentifier::new("1.40").is_err());
        assert!(ObjectIdentifier::new("1.2.x").is_err());
        assert!(ObjectIdentifier::new("").is_err());
    }

    #[test]
    fn test_oid_from_contents() {
        let oid = ObjectIdentifier::from_contents(vec![0x55, 0x1D, 0x13]).unwrap();
        assert_eq!(oid.to_string(), "2.5.29.19");

        assert!(ObjectIdentifier::from_contents(vec![]).is_err());
        assert!(ObjectIdentifier::from_contents(vec![0x55, 0x81]).is_err());
        assert!(ObjectIdentifier::from_contents(vec![0x55, 0x80, 0x01]).is_err());
    }

    #[test]
    fn test_oid_from_static() {
        let oid = ObjectIdentifier::from_static(&[0x55, 0x1D, 0x13]);
        assert_eq!(oid, ObjectIdentifier::new("2.5.29.19").unwrap());
    }

    #[test]
    fn test_oid_branch() {
        let ce = ObjectIdentifier::new("2.5.29").unwrap();
        let bc = ce.branch(19).unwrap();
        assert_eq!(bc.to_string(), "2.5.29.19");
        assert!(bc.is_branch_of(&ce));
        assert!(!ce.is_branch_of(&ce));
    }

    #[test]
    fn test_oid_parse_trait() {
        let oid: ObjectIdentifier = "2.5.4.3".parse().unwrap();
        assert_eq!(oid.arcs(), vec![2, 5, 4, 3]);
    }
}
