//! BOOLEAN

use crate::coerce::universal_type;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use log::warn;
use std::fmt;

/// BOOLEAN value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boolean(bool);

impl Boolean {
    pub const TRUE: Boolean = Boolean(true);
    pub const FALSE: Boolean = Boolean(false);

    pub fn new(value: bool) -> Self {
        Boolean(value)
    }

    pub fn value(&self) -> bool {
        self.0
    }

    /// Parse contents octets
    ///
    /// DER only accepts `0x00` and `0xFF`; BER and DL treat any non-zero
    /// octet as TRUE.
    pub(crate) fn from_contents(contents: &[u8], rule: EncodingRule) -> Asn1Result<Self> {
        let [octet] = contents else {
            return Err(Asn1Error::MalformedInput(format!(
                "BOOLEAN value should have 1 byte in it, found {}",
                contents.len()
            )));
        };

        match *octet {
            0x00 => Ok(Boolean::FALSE),
            0xFF => Ok(Boolean::TRUE),
            other if rule == EncodingRule::Der => Err(Asn1Error::MalformedInput(format!(
                "BOOLEAN contents 0x{:02X} not allowed under DER",
                other
            ))),
            other => {
                warn!("accepting non-canonical BOOLEAN contents 0x{:02X}", other);
                Ok(Boolean::TRUE)
            }
        }
    }

    pub(crate) fn encoding(&self) -> Encoding<'static> {
        let octet = if self.0 { 0xFF } else { 0x00 };
        Encoding::primitive(Tag::universal(false, universal::BOOLEAN), vec![octet])
    }
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Boolean(value)
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "TRUE" } else { "FALSE" })
    }
}

universal_type!(Boolean, Boolean, "BOOLEAN", universal::BOOLEAN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_contents() {
        assert_eq!(Boolean::from_contents(&[0xFF], EncodingRule::Der).unwrap(), Boolean::TRUE);
        assert_eq!(Boolean::from_contents(&[0x00], EncodingRule::Der).unwrap(), Boolean::FALSE);
        assert_eq!(Boolean::from_contents(&[0x01], EncodingRule::Ber).unwrap(), Boolean::TRUE);
        assert!(Boolean::from_contents(&[0x01], EncodingRule::Der).is_err());
        assert!(Boolean::from_contents(&[], EncodingRule::Ber).is_err());
        assert!(Boolean::from_contents(&[0xFF, 0x00], EncodingRule::Ber).is_err());
    }

    #[test]
    fn test_boolean_encoding() {
        assert_eq!(Boolean::TRUE.encoding().to_vec(), vec![0x01, 0x01, 0xFF]);
        assert_eq!(Boolean::FALSE.encoding().to_vec(), vec![0x01, 0x01, 0x00]);
    }
}
