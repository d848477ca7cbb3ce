//! ASN.1 encoding-rule engine
//!
//! This crate turns bytes into [`Asn1Value`]s and back under three encoding
//! rules (BER, DER, DL), and provides the schema-side tools to turn generic
//! values into typed ones: type coercion, tagged-object resolution, positional
//! SEQUENCE parsing and CHOICE dispatch.
//!
//! # Layers
//!
//! - [`tag`], [`length`]: identifier and length octets
//! - [`encoding`]: the encoded form of a value, lengths computed bottom-up
//! - [`types`], [`value`]: the value model
//! - [`registry`]: universal tag number to constructor table
//! - [`decoder`], [`encoder`]: TLV reading and writing
//! - [`coerce`], [`resolver`], [`cursor`], [`choice`]: schema-side resolution
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_codec::{decode, encode, EncodingRule};
//! use asn1_codec::types::OctetString;
//!
//! let empty = OctetString::new(&[]);
//! let bytes = encode(&empty.into(), EncodingRule::Der);
//! assert_eq!(bytes, vec![0x04, 0x00]);
//! assert!(decode(&bytes).is_ok());
//! ```

pub mod choice;
pub mod coerce;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod encoding;
pub mod length;
pub mod registry;
pub mod resolver;
pub mod tag;
pub mod types;
pub mod value;

pub use asn1_core::{Asn1Error, Asn1Result, DecoderConfig, DecoderConfigBuilder, EncodingRule};
pub use choice::{Alternative, Asn1Choice};
pub use coerce::{Asn1Input, Asn1Type, UniversalType};
pub use cursor::SequenceCursor;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use encoding::Encoding;
pub use tag::{Tag, TagClass};
pub use value::Asn1Value;

use std::io::Write;

/// Decode exactly one TLV unit, accepting any BER form
pub fn decode(bytes: &[u8]) -> Asn1Result<Asn1Value> {
    Decoder::new(bytes).decode_complete()
}

/// Decode exactly one TLV unit under the given rule and limits
pub fn decode_with(bytes: &[u8], config: DecoderConfig) -> Asn1Result<Asn1Value> {
    Decoder::with_config(bytes, config).decode_complete()
}

/// Encode a value under `rule`
pub fn encode(value: &Asn1Value, rule: EncodingRule) -> Vec<u8> {
    value.to_bytes(rule)
}

/// Encode a value under `rule` into `writer`
pub fn encode_to<W: Write>(value: &Asn1Value, rule: EncodingRule, writer: &mut W) -> Asn1Result<()> {
    let mut encoder = Encoder::new(rule);
    encoder.encode_value(value);
    encoder.write_to(writer)
}
