//! Encoder for BER, DER and DL output
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_codec::EncodingRule;
//! use asn1_codec::encoder::Encoder;
//! use asn1_codec::types::{Integer, Sequence};
//!
//! let seq = Sequence::new(vec![Integer::from_i64(5).into()]);
//! let mut encoder = Encoder::new(EncodingRule::Der);
//! encoder.encode_value(&seq.into());
//! assert_eq!(encoder.into_bytes(), vec![0x30, 0x03, 0x02, 0x01, 0x05]);
//! ```

use crate::encoding::Encoding;
use crate::value::Asn1Value;
use asn1_core::{Asn1Result, EncodingRule};
use bytes::BytesMut;
use log::trace;
use std::io::Write;

/// Encoder for TLV units
///
/// Each encoded value consists of a TLV (Tag-Length-Value) triplet written
/// under one encoding rule:
/// - **BER**: constructed values use the indefinite length form
/// - **DER**: shortest definite lengths, SET elements sorted
/// - **DL**: shortest definite lengths, elements in given order
///
/// # Memory Management
///
/// The encoder accumulates output in a `BytesMut` buffer. Every value's
/// encoded length is known before it is written, so the buffer is reserved
/// once per value.
pub struct Encoder {
    buffer: BytesMut,
    rule: EncodingRule,
}

impl Encoder {
    /// Create a new encoder for `rule`
    pub fn new(rule: EncodingRule) -> Self {
        Self {
            buffer: BytesMut::new(),
            rule,
        }
    }

    /// Create a new encoder with initial capacity
    pub fn with_capacity(rule: EncodingRule, capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            rule,
        }
    }

    pub fn rule(&self) -> EncodingRule {
        self.rule
    }

    /// Append one value
    pub fn encode_value(&mut self, value: &Asn1Value) {
        let encoding = value.encoding(self.rule);
        self.encode_encoding(&encoding);
    }

    /// Append an already built encoded form
    pub fn encode_encoding(&mut self, encoding: &Encoding<'_>) {
        let len = encoding.encoded_len();
        trace!("encoding {} ({} octets) under {}", encoding.tag(), len, self.rule);
        self.buffer.reserve(len);
        encoding.write_to(&mut self.buffer);
    }

    /// Get encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume encoder and return the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Copy the encoded bytes to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Asn1Result<()> {
        writer.write_all(&self.buffer)?;
        Ok(())
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncodingRule::Der)
    }
}
