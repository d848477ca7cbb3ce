//! BIT STRING
//!
//! Contents octets are a pad-bit count (0-7) followed by the data octets. The
//! pad count says how many low-order bits of the last data octet are unused.
//!
//! Unused bits never take part in equality or hashing, and are cleared when
//! re-encoding under DER. Under DL and BER the stored octets are written as
//! they are.

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// BIT STRING value
#[derive(Debug, Clone)]
pub struct BitString {
    /// `contents[0]` is the pad-bit count, the rest is data
    contents: Box<[u8]>,
}

impl BitString {
    /// Build from data octets and a pad-bit count (copied)
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `pad_bits` is outside 0-7, or non-zero
    /// for empty data.
    pub fn new(data: &[u8], pad_bits: u8) -> Asn1Result<Self> {
        if pad_bits > 7 {
            return Err(Asn1Error::InvalidArgument(format!(
                "pad bits cannot be greater than 7, got {}",
                pad_bits
            )));
        }
        if data.is_empty() && pad_bits != 0 {
            return Err(Asn1Error::InvalidArgument(
                "zero length data with non-zero pad bits".to_string(),
            ));
        }

        let mut contents = Vec::with_capacity(data.len() + 1);
        contents.push(pad_bits);
        contents.extend_from_slice(data);
        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Octet-aligned BIT STRING (pad 0)
    pub fn from_octets(data: &[u8]) -> Self {
        let mut contents = Vec::with_capacity(data.len() + 1);
        contents.push(0);
        contents.extend_from_slice(data);
        Self {
            contents: contents.into_boxed_slice(),
        }
    }

    /// Build from a named-bit mask
    ///
    /// Bit 0 of the ASN.1 definition is `0x80` of the low byte of
    /// `named_bits`, bit 8 is `0x8000`, and so on (the X.509 KeyUsage layout).
    /// Trailing zero bits are dropped.
    pub fn from_named_bits(named_bits: u32) -> Self {
        if named_bits == 0 {
            return Self {
                contents: vec![0u8].into_boxed_slice(),
            };
        }

        let bits = 32 - named_bits.leading_zeros() as usize;
        let len = bits.div_ceil(8);
        let data: Vec<u8> = (0..len).map(|i| (named_bits >> (8 * i)) as u8).collect();
        let pad_bits = data[len - 1].trailing_zeros() as u8;

        let mut contents = Vec::with_capacity(len + 1);
        contents.push(pad_bits);
        contents.extend_from_slice(&data);
        Self {
            contents: contents.into_boxed_slice(),
        }
    }

    /// Adopt decoded contents octets
    pub(crate) fn from_contents(contents: Vec<u8>, rule: EncodingRule) -> Asn1Result<Self> {
        let Some(&pad_bits) = contents.first() else {
            return Err(Asn1Error::MalformedInput(
                "truncated BIT STRING detected".to_string(),
            ));
        };
        if pad_bits > 7 {
            return Err(Asn1Error::MalformedInput(format!(
                "invalid pad bits detected: {}",
                pad_bits
            )));
        }
        if contents.len() == 1 && pad_bits != 0 {
            return Err(Asn1Error::MalformedInput(
                "zero length data with non-zero pad bits".to_string(),
            ));
        }
        if rule == EncodingRule::Der && pad_bits > 0 {
            let last = contents[contents.len() - 1];
            if last & !(0xFFu8 << pad_bits) != 0 {
                return Err(Asn1Error::MalformedInput(
                    "DER BIT STRING with non-zero unused bits".to_string(),
                ));
            }
        }

        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Join the segments of a constructed (BER) BIT STRING
    pub(crate) fn from_segments(segments: &[BitString]) -> Asn1Result<Self> {
        let mut contents = vec![0u8];
        for (i, segment) in segments.iter().enumerate() {
            if segment.pad_bits() != 0 && i + 1 != segments.len() {
                return Err(Asn1Error::MalformedInput(
                    "only the last nested BIT STRING may have padding".to_string(),
                ));
            }
            contents[0] = segment.pad_bits();
            contents.extend_from_slice(segment.data());
        }
        Ok(Self {
            contents: contents.into_boxed_slice(),
        })
    }

    /// Number of unused bits in the last data octet
    pub fn pad_bits(&self) -> u8 {
        self.contents[0]
    }

    /// Data octets as stored, unused bits included
    pub fn data(&self) -> &[u8] {
        &self.contents[1..]
    }

    /// Data octets with unused bits cleared
    pub fn bytes(&self) -> Vec<u8> {
        let mut data = self.data().to_vec();
        if let Some(last) = data.last_mut() {
            *last &= 0xFFu8 << self.pad_bits();
        }
        data
    }

    /// Data octets, only if the string is octet aligned
    pub fn octets(&self) -> Option<&[u8]> {
        (self.pad_bits() == 0).then(|| self.data())
    }

    /// Number of significant bits
    pub fn len_bits(&self) -> usize {
        self.data().len() * 8 - self.pad_bits() as usize
    }

    /// Up to the first 4 data octets as a little-endian named-bit mask
    ///
    /// Inverse of [`BitString::from_named_bits`].
    pub fn int_value(&self) -> u32 {
        let data = self.data();
        let end = data.len().min(4);
        let mut value = 0u32;
        for (i, b) in data[..end].iter().enumerate() {
            let mut octet = *b;
            if i + 1 == data.len() {
                octet &= 0xFFu8 << self.pad_bits();
            }
            value |= (octet as u32) << (8 * i);
        }
        value
    }

    fn masked_last(&self) -> Option<u8> {
        self.data()
            .last()
            .map(|last| last & (0xFFu8 << self.pad_bits()))
    }

    pub(crate) fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        let tag = Tag::universal(false, universal::BIT_STRING);
        let needs_mask = rule == EncodingRule::Der
            && self.pad_bits() > 0
            && self.masked_last() != self.data().last().copied();

        if needs_mask {
            let mut contents = self.contents.to_vec();
            let last = contents.len() - 1;
            contents[last] &= 0xFFu8 << self.pad_bits();
            Encoding::primitive(tag, Cow::Owned(contents))
        } else {
            Encoding::primitive(tag, &self.contents[..])
        }
    }
}

impl PartialEq for BitString {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.data(), other.data());
        if self.pad_bits() != other.pad_bits() || a.len() != b.len() {
            return false;
        }
        let n = a.len();
        n == 0 || (a[..n - 1] == b[..n - 1] && self.masked_last() == other.masked_last())
    }
}

impl Eq for BitString {}

impl Hash for BitString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pad_bits().hash(state);
        let data = self.data();
        if let Some((_, head)) = data.split_last() {
            head.hash(state);
        }
        self.masked_last().hash(state);
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for b in self.contents.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

universal_type!(BitString, BitString, "BIT STRING", universal::BIT_STRING);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_new_validation() {
        assert!(BitString::new(&[0xF8], 3).is_ok());
        assert!(matches!(BitString::new(&[0xF8], 8), Err(Asn1Error::InvalidArgument(_))));
        assert!(matches!(BitString::new(&[], 1), Err(Asn1Error::InvalidArgument(_))));
        assert!(BitString::new(&[], 0).is_ok());
    }

    #[test]
    fn test_bit_string_from_contents() {
        let bits = BitString::from_contents(vec![0x03, 0xF8], EncodingRule::Der).unwrap();
        assert_eq!(bits.pad_bits(), 3);
        assert_eq!(bits.len_bits(), 5);

        assert!(matches!(
            BitString::from_contents(vec![0x09, 0xF8], EncodingRule::Ber),
            Err(Asn1Error::MalformedInput(_))
        ));
        assert!(BitString::from_contents(vec![], EncodingRule::Ber).is_err());
        assert!(BitString::from_contents(vec![0x01], EncodingRule::Ber).is_err());
    }

    #[test]
    fn test_bit_string_unused_bits() {
        // 0xFF with 3 unused bits: DER rejects on decode, masks on encode
        assert!(BitString::from_contents(vec![0x03, 0xFF], EncodingRule::Der).is_err());
        let loose = BitString::from_contents(vec![0x03, 0xFF], EncodingRule::Dl).unwrap();

        assert_eq!(loose.encoding(EncodingRule::Dl).to_vec(), vec![0x03, 0x02, 0x03, 0xFF]);
        assert_eq!(loose.encoding(EncodingRule::Der).to_vec(), vec![0x03, 0x02, 0x03, 0xF8]);

        let strict = BitString::new(&[0xF8], 3).unwrap();
        assert_eq!(loose, strict);
        assert_eq!(loose.bytes(), vec![0xF8]);
        assert_eq!(loose.octets(), None);
    }

    #[test]
    fn test_bit_string_named_bits() {
        // digitalSignature | keyEncipherment
        let bits = BitString::from_named_bits(0x80 | 0x20);
        assert_eq!(bits.pad_bits(), 5);
        assert_eq!(bits.data(), &[0xA0]);
        assert_eq!(bits.int_value(), 0xA0);

        // decipherOnly
        let bits = BitString::from_named_bits(0x8000);
        assert_eq!(bits.data(), &[0x00, 0x80]);
        assert_eq!(bits.pad_bits(), 7);
        assert_eq!(bits.int_value(), 0x8000);

        assert_eq!(BitString::from_named_bits(0).data(), &[] as &[u8]);
    }

    #[test]
    fn test_bit_string_segments() {
        let a = BitString::from_octets(&[0x01, 0x02]);
        let b = BitString::new(&[0xF0], 4).unwrap();
        let joined = BitString::from_segments(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(joined.data(), &[0x01, 0x02, 0xF0]);
        assert_eq!(joined.pad_bits(), 4);

        assert!(BitString::from_segments(&[b, a]).is_err());
    }
}
