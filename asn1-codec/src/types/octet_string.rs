//! OCTET STRING

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use std::fmt;

/// OCTET STRING value
///
/// [`OctetString::new`] copies the caller's bytes; the value never aliases a
/// buffer the caller can still mutate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OctetString {
    contents: Box<[u8]>,
}

impl OctetString {
    pub fn new(octets: &[u8]) -> Self {
        Self {
            contents: octets.into(),
        }
    }

    /// Take ownership of a buffer produced by the decoder
    pub(crate) fn adopt(contents: Vec<u8>) -> Self {
        Self {
            contents: contents.into_boxed_slice(),
        }
    }

    pub fn octets(&self) -> &[u8] {
        &self.contents
    }

    /// Independent copy of the octets
    pub fn to_octets(&self) -> Vec<u8> {
        self.contents.to_vec()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub(crate) fn encoding(&self) -> Encoding<'_> {
        Encoding::primitive(Tag::universal(false, universal::OCTET_STRING), &self.contents[..])
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for b in self.contents.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

universal_type!(OctetString, OctetString, "OCTET STRING", universal::OCTET_STRING);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octet_string_copies_input() {
        let mut source = vec![1u8, 2, 3];
        let octets = OctetString::new(&source);
        source[0] = 9;
        assert_eq!(octets.octets(), &[1, 2, 3]);
    }

    #[test]
    fn test_empty_octet_string_encoding() {
        let octets = OctetString::new(&[]);
        assert!(octets.is_empty());
        assert_eq!(octets.encoding().to_vec(), vec![0x04, 0x00]);
    }

    #[test]
    fn test_octet_string_display() {
        assert_eq!(OctetString::new(&[0xDE, 0xAD]).to_string(), "#dead");
    }
}
