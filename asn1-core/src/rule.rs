//! Encoding rule variants
//!
//! One value model, three wire renderings:
//!
//! - **BER** (Basic Encoding Rules): the permissive form. Decoding accepts
//!   indefinite lengths, non-minimal length octets and constructed string
//!   segments. Encoding emits constructed values with indefinite length.
//! - **DER** (Distinguished Encoding Rules): the canonical form. Definite,
//!   shortest-form lengths only, SET elements sorted by their encodings.
//! - **DL** (Definite-Length): definite lengths like DER, but without the
//!   canonical ordering constraints.
//!
//! Decoding any of the three forms of the same logical value produces equal
//! in-memory values; only the re-encoded bytes may differ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding rule variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncodingRule {
    /// Basic Encoding Rules
    #[default]
    Ber,
    /// Distinguished Encoding Rules
    Der,
    /// Definite-Length encoding
    Dl,
}

impl EncodingRule {
    /// Is the indefinite length form (`0x80`) accepted / emitted?
    pub fn allows_indefinite(self) -> bool {
        matches!(self, EncodingRule::Ber)
    }

    /// Must length octets use the shortest possible form?
    pub fn requires_minimal_length(self) -> bool {
        matches!(self, EncodingRule::Der)
    }

    /// Are SET elements sorted by their encodings?
    pub fn sorts_set_elements(self) -> bool {
        matches!(self, EncodingRule::Der)
    }

    /// Are constructed encodings of string types accepted?
    pub fn allows_constructed_strings(self) -> bool {
        matches!(self, EncodingRule::Ber)
    }

    /// Short upper-case name ("BER", "DER", "DL")
    pub fn name(self) -> &'static str {
        match self {
            EncodingRule::Ber => "BER",
            EncodingRule::Der => "DER",
            EncodingRule::Dl => "DL",
        }
    }
}

impl fmt::Display for EncodingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_flags() {
        assert!(EncodingRule::Ber.allows_indefinite());
        assert!(!EncodingRule::Der.allows_indefinite());
        assert!(!EncodingRule::Dl.allows_indefinite());

        assert!(EncodingRule::Der.sorts_set_elements());
        assert!(!EncodingRule::Dl.sorts_set_elements());
        assert!(!EncodingRule::Dl.requires_minimal_length());
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(EncodingRule::default(), EncodingRule::Ber);
        assert_eq!(format!("{}", EncodingRule::Dl), "DL");
    }
}
