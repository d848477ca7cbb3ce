//! asn1 - ASN.1 BER/DER/DL codec
//!
//! This library decodes and encodes ASN.1 values under the Basic (BER),
//! Distinguished (DER) and definite-length (DL) encoding rules, and resolves
//! decoded values into typed structures.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `asn1-core`: Error type, encoding rules and decoder configuration
//! - `asn1-codec`: Tags, lengths, the value model, encoder/decoder, tagged
//!   object resolution, type coercion, sequence cursor and CHOICE dispatch
//! - `asn1-x509`: X.509 structures built on the coercion contract
//!
//! # Usage
//!
//! ```rust
//! use asn1::{decode, encode, EncodingRule};
//! use asn1::coerce::{get_instance, Asn1Input};
//! use asn1::types::Integer;
//!
//! let value = decode(&[0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00])?;
//! assert_eq!(encode(&value, EncodingRule::Der), vec![0x30, 0x03, 0x02, 0x01, 0x05]);
//!
//! let n: Integer = get_instance(Asn1Input::Bytes(&[0x02, 0x01, 0x05]))?;
//! assert_eq!(n.to_i64(), Some(5));
//! # Ok::<(), asn1::Asn1Error>(())
//! ```

// Re-export core types
pub use asn1_core::{Asn1Error, Asn1Result, DecoderConfig, DecoderConfigBuilder, EncodingRule};

// Re-export the codec
pub use asn1_codec::{
    Alternative, Asn1Choice, Asn1Input, Asn1Type, Asn1Value, Decoder, Encoder, Encoding,
    SequenceCursor, Tag, TagClass, UniversalType, decode, decode_with, encode, encode_to,
};
pub use asn1_codec::{choice, coerce, cursor, registry, resolver, tag, types};

// Re-export X.509 structures
pub mod x509 {
    pub use asn1_x509::*;
}
