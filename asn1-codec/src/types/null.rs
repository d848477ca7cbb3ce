//! NULL

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use asn1_core::{Asn1Error, Asn1Result};
use std::fmt;

/// NULL value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Null;

impl Null {
    pub(crate) fn from_contents(contents: &[u8]) -> Asn1Result<Self> {
        if !contents.is_empty() {
            return Err(Asn1Error::MalformedInput(
                "malformed NULL encoding encountered".to_string(),
            ));
        }
        Ok(Null)
    }

    pub(crate) fn encoding(&self) -> Encoding<'static> {
        Encoding::primitive(Tag::universal(false, universal::NULL), Vec::new())
    }
}

impl fmt::Display for Null {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NULL")
    }
}

universal_type!(Null, Null, "NULL", universal::NULL);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        assert_eq!(Null.encoding().to_vec(), vec![0x05, 0x00]);
        assert!(Null::from_contents(&[]).is_ok());
        assert!(Null::from_contents(&[0x00]).is_err());
    }
}
