//! X.509 structures on top of the ASN.1 codec
//!
//! These structures use the codec only through its coercion contract:
//! [`get_instance`](asn1_codec::coerce::get_instance) for whole values,
//! [`SequenceCursor`](asn1_codec::SequenceCursor) for positional fields and
//! [`Asn1Choice`](asn1_codec::Asn1Choice) for untagged alternatives.
//!
//! # Modules
//!
//! - [`extensions`]: `Extensions ::= SEQUENCE OF Extension`, with duplicate detection
//! - [`time`]: `Time ::= CHOICE { utcTime, generalTime }`
//! - [`directory_string`]: `DirectoryString ::= CHOICE { ... }`
//! - [`algorithm`]: `AlgorithmIdentifier`, `SubjectPublicKeyInfo`
//! - [`constraints`]: `BasicConstraints`, `AuthorityKeyIdentifier`

pub mod algorithm;
pub mod constraints;
pub mod directory_string;
pub mod extensions;
pub mod time;

pub use algorithm::{AlgorithmIdentifier, SubjectPublicKeyInfo};
pub use constraints::{AuthorityKeyIdentifier, BasicConstraints};
pub use directory_string::DirectoryString;
pub use extensions::{Extension, Extensions};
pub use time::Time;

use asn1_codec::coerce::coercion_error;
use asn1_codec::types::Sequence;
use asn1_codec::value::Asn1Value;
use asn1_core::Asn1Result;

/// Borrow `value` as a SEQUENCE, or fail naming `type_name`
pub(crate) fn expect_sequence<'a>(value: &'a Asn1Value, type_name: &str) -> Asn1Result<&'a Sequence> {
    value
        .as_sequence()
        .ok_or_else(|| coercion_error(type_name, value))
}
