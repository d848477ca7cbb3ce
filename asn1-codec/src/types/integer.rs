//! INTEGER and ENUMERATED
//!
//! Both are stored as their minimal two's complement contents octets, so
//! arbitrarily large values (certificate serial numbers, RSA moduli) round
//! trip unchanged and equality is plain octet equality.

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use asn1_core::{Asn1Error, Asn1Result};
use std::fmt;

/// Validate two's complement contents: non-empty and without redundant
/// leading sign octets.
fn check_contents(contents: &[u8], type_name: &str) -> Asn1Result<()> {
    match contents {
        [] => Err(Asn1Error::MalformedInput(format!(
            "malformed {}: empty contents",
            type_name
        ))),
        [0x00, next, ..] if next & 0x80 == 0 => Err(Asn1Error::MalformedInput(format!(
            "malformed {}: redundant leading 0x00",
            type_name
        ))),
        [0xFF, next, ..] if next & 0x80 != 0 => Err(Asn1Error::MalformedInput(format!(
            "malformed {}: redundant leading 0xFF",
            type_name
        ))),
        _ => Ok(()),
    }
}

/// Minimal two's complement octets of an i64
fn i64_octets(value: i64) -> Vec<u8> {
    trim_signed(&value.to_be_bytes())
}

/// Drop redundant leading sign octets
fn trim_signed(bytes: &[u8]) -> Vec<u8> {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (current, next) = (bytes[start], bytes[start + 1]);
        let redundant = (current == 0x00 && next & 0x80 == 0) || (current == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

fn octets_to_i64(bytes: &[u8]) -> Option<i64> {
    if bytes.len() > 8 {
        return None;
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Some(i64::from_be_bytes(buf))
}

fn fmt_octets(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match octets_to_i64(bytes) {
        Some(value) => write!(f, "{}", value),
        None => {
            f.write_str("0x")?;
            for b in bytes {
                write!(f, "{:02X}", b)?;
            }
            Ok(())
        }
    }
}

/// INTEGER value of arbitrary size
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    bytes: Box<[u8]>,
}

impl Integer {
    pub fn from_i64(value: i64) -> Self {
        Self {
            bytes: i64_octets(value).into_boxed_slice(),
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_unsigned_bytes(&value.to_be_bytes())
    }

    /// Build from big-endian two's complement octets (copied, then trimmed)
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty slice.
    pub fn from_signed_bytes(bytes: &[u8]) -> Asn1Result<Self> {
        if bytes.is_empty() {
            return Err(Asn1Error::InvalidArgument(
                "INTEGER needs at least one octet".to_string(),
            ));
        }
        Ok(Self {
            bytes: trim_signed(bytes).into_boxed_slice(),
        })
    }

    /// Build a non-negative value from big-endian magnitude octets
    pub fn from_unsigned_bytes(magnitude: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(magnitude.len() + 1);
        bytes.push(0x00);
        bytes.extend_from_slice(magnitude);
        Self {
            bytes: trim_signed(&bytes).into_boxed_slice(),
        }
    }

    /// Adopt decoded contents octets
    pub(crate) fn from_contents(contents: Vec<u8>) -> Asn1Result<Self> {
        check_contents(&contents, "INTEGER")?;
        Ok(Self {
            bytes: contents.into_boxed_slice(),
        })
    }

    /// Two's complement contents octets
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Magnitude octets of a non-negative value, without the sign octet
    pub fn unsigned_bytes(&self) -> Option<&[u8]> {
        if self.is_negative() {
            return None;
        }
        match &self.bytes[..] {
            [0x00, rest @ ..] if !rest.is_empty() => Some(rest),
            all => Some(all),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.bytes[0] & 0x80 != 0
    }

    /// Value as i64, `None` if it does not fit
    pub fn to_i64(&self) -> Option<i64> {
        octets_to_i64(&self.bytes)
    }

    /// Value as u64, `None` if negative or too large
    pub fn to_u64(&self) -> Option<u64> {
        let magnitude = self.unsigned_bytes()?;
        if magnitude.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[8 - magnitude.len()..].copy_from_slice(magnitude);
        Some(u64::from_be_bytes(buf))
    }

    /// Does this INTEGER equal `value`?
    pub fn has_value(&self, value: i64) -> bool {
        self.to_i64() == Some(value)
    }

    pub(crate) fn encoding(&self) -> Encoding<'_> {
        Encoding::primitive(Tag::universal(false, universal::INTEGER), &self.bytes[..])
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_octets(&self.bytes, f)
    }
}

universal_type!(Integer, Integer, "INTEGER", universal::INTEGER);

/// ENUMERATED value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Enumerated {
    bytes: Box<[u8]>,
}

impl Enumerated {
    pub fn new(value: i64) -> Self {
        Self {
            bytes: i64_octets(value).into_boxed_slice(),
        }
    }

    pub(crate) fn from_contents(contents: Vec<u8>) -> Asn1Result<Self> {
        check_contents(&contents, "ENUMERATED")?;
        Ok(Self {
            bytes: contents.into_boxed_slice(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_i64(&self) -> Option<i64> {
        octets_to_i64(&self.bytes)
    }

    pub fn has_value(&self, value: i64) -> bool {
        self.to_i64() == Some(value)
    }

    pub(crate) fn encoding(&self) -> Encoding<'_> {
        Encoding::primitive(Tag::universal(false, universal::ENUMERATED), &self.bytes[..])
    }
}

impl fmt::Display for Enumerated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_octets(&self.bytes, f)
    }
}

universal_type!(Enumerated, Enumerated, "ENUMERATED", universal::ENUMERATED);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_minimal_encoding() {
        assert_eq!(Integer::from_i64(0).as_bytes(), &[0x00]);
        assert_eq!(Integer::from_i64(127).as_bytes(), &[0x7F]);
        assert_eq!(Integer::from_i64(128).as_bytes(), &[0x00, 0x80]);
        assert_eq!(Integer::from_i64(-1).as_bytes(), &[0xFF]);
        assert_eq!(Integer::from_i64(-128).as_bytes(), &[0x80]);
        assert_eq!(Integer::from_i64(-129).as_bytes(), &[0xFF, 0x7F]);
    }

    #[test]
    fn test_integer_values() {
        for v in [0i64, 1, -1, 255, 256, -32768, i64::MAX, i64::MIN] {
            assert_eq!(Integer::from_i64(v).to_i64(), Some(v));
        }
        assert_eq!(Integer::from_u64(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(Integer::from_u64(u64::MAX).to_i64(), None);
        assert_eq!(Integer::from_i64(-5).to_u64(), None);
    }

    #[test]
    fn test_integer_unsigned_bytes() {
        let n = Integer::from_unsigned_bytes(&[0xBA, 0xC0]);
        assert_eq!(n.as_bytes(), &[0x00, 0xBA, 0xC0]);
        assert_eq!(n.unsigned_bytes(), Some(&[0xBA, 0xC0][..]));
        assert!(!n.is_negative());
    }

    #[test]
    fn test_integer_from_contents() {
        assert!(Integer::from_contents(vec![]).is_err());
        assert!(Integer::from_contents(vec![0x00, 0x05]).is_err());
        assert!(Integer::from_contents(vec![0xFF, 0x80]).is_err());
        assert!(Integer::from_contents(vec![0x00, 0x80]).is_ok());
    }

    #[test]
    fn test_integer_display() {
        assert_eq!(Integer::from_i64(-42).to_string(), "-42");
        let big = Integer::from_unsigned_bytes(&[0xFF; 9]);
        assert_eq!(big.to_string(), "0x00FFFFFFFFFFFFFFFFFF");
    }

    #[test]
    fn test_enumerated() {
        let e = Enumerated::new(3);
        assert_eq!(e.encoding().to_vec(), vec![0x0A, 0x01, 0x03]);
        assert!(e.has_value(3));
    }
}
