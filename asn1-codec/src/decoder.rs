//! Decoder for BER, DER and DL input
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_codec::{DecoderConfig, EncodingRule};
//! use asn1_codec::decoder::Decoder;
//!
//! let data = [0x30, 0x03, 0x02, 0x01, 0x05];
//! let value = Decoder::with_config(&data, DecoderConfig::for_rule(EncodingRule::Der))
//!     .decode_complete()?;
//! assert_eq!(value.to_der(), data);
//! # Ok::<(), asn1_codec::Asn1Error>(())
//! ```

use crate::length::Length;
use crate::registry;
use crate::tag::{Tag, TagClass, universal};
use crate::types::TaggedObject;
use crate::value::{Asn1Value, UnknownContent, UnknownValue};
use asn1_core::{Asn1Error, Asn1Result, DecoderConfig};
use log::{debug, trace};

/// Decoder for TLV units
///
/// The decoder reads TLV (Tag-Length-Value) triplets from a byte buffer and
/// builds [`Asn1Value`]s, checking every header against the configured rule.
///
/// # Position Tracking
///
/// The decoder maintains a position pointer that advances as data is decoded.
/// This allows sequential decoding of multiple values from the same buffer.
///
/// # Error Handling
///
/// All decoding operations return `Result` types. Errors can occur due to:
/// - Buffer underflow (declared length exceeds the input)
/// - Encodings the rule forbids (indefinite or non-minimal lengths under DER)
/// - Invalid contents for the decoded type
/// - Configured depth or length limits
pub struct Decoder<'a> {
    buffer: &'a [u8],
    position: usize,
    config: DecoderConfig,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a BER-permissive decoder with default limits
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, DecoderConfig::default())
    }

    /// Create a decoder with explicit settings
    pub fn with_config(buffer: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            buffer,
            position: 0,
            config,
            depth: 0,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Child decoder over `buffer`, one nesting level deeper
    fn nested(&self, buffer: &'a [u8]) -> Asn1Result<Decoder<'a>> {
        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            debug!("nesting depth {} exceeds limit {}", depth, self.config.max_depth);
            return Err(Asn1Error::LimitExceeded(format!(
                "nesting depth exceeds {}",
                self.config.max_depth
            )));
        }
        Ok(Decoder {
            buffer,
            position: 0,
            config: self.config,
            depth,
        })
    }

    fn read_bytes(&mut self, count: usize) -> Asn1Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(Asn1Error::MalformedInput(format!(
                "truncated input: need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode the identifier and length octets of the next TLV unit
    ///
    /// # Error Handling
    /// - `MalformedInput` for bad headers or a declared length past the end
    ///   of the input
    /// - `LimitExceeded` for a declared length above `max_content_length`
    pub fn read_header(&mut self) -> Asn1Result<(Tag, Length)> {
        let start = self.position;

        let (tag, tag_len) = Tag::decode(&self.buffer[self.position..], self.config.rule)?;
        self.position += tag_len;

        let (length, length_len) = Length::decode(&self.buffer[self.position..], self.config.rule)?;
        self.position += length_len;

        if let Length::Definite(len) = length {
            if len > self.config.max_content_length {
                debug!(
                    "{} declares {} content octets, limit is {}",
                    tag, len, self.config.max_content_length
                );
                return Err(Asn1Error::LimitExceeded(format!(
                    "content length {} exceeds {}",
                    len, self.config.max_content_length
                )));
            }
            if len > self.remaining() {
                return Err(Asn1Error::MalformedInput(format!(
                    "truncated input: {} declares {} content octets, {} available",
                    tag,
                    len,
                    self.remaining()
                )));
            }
        }

        trace!("{} {:?} at offset {} ({})", tag, length, start, self.config.rule);
        Ok((tag, length))
    }

    /// Decode the next complete TLV unit
    pub fn read_value(&mut self) -> Asn1Result<Asn1Value> {
        let start = self.position;
        let (tag, length) = self.read_header()?;

        if tag.is_universal(universal::END_OF_CONTENTS) {
            return Err(Asn1Error::MalformedInput(format!(
                "unexpected end-of-contents marker at offset {}",
                start
            )));
        }

        if tag.is_constructed() {
            let elements = self.read_elements(length)?;
            self.build_constructed(tag, elements)
        } else {
            let Length::Definite(len) = length else {
                return Err(Asn1Error::MalformedInput(format!(
                    "indefinite length used with primitive {}",
                    tag
                )));
            };
            let contents = self.read_bytes(len)?.to_vec();
            self.build_primitive(tag, contents)
        }
    }

    /// Decode TLV units until the input is exhausted
    pub fn read_all(&mut self) -> Asn1Result<Vec<Asn1Value>> {
        let mut values = Vec::new();
        while self.has_remaining() {
            values.push(self.read_value()?);
        }
        Ok(values)
    }

    /// Decode exactly one TLV unit spanning the whole input
    pub fn decode_complete(mut self) -> Asn1Result<Asn1Value> {
        let value = self.read_value()?;
        if self.has_remaining() {
            debug!("{} trailing bytes after top-level value", self.remaining());
            return Err(Asn1Error::MalformedInput(format!(
                "{} trailing bytes after top-level value",
                self.remaining()
            )));
        }
        Ok(value)
    }

    fn read_elements(&mut self, length: Length) -> Asn1Result<Vec<Asn1Value>> {
        match length {
            Length::Definite(len) => {
                let contents = self.read_bytes(len)?;
                self.nested(contents)?.read_all()
            }
            Length::Indefinite => {
                let mut nested = self.nested(&self.buffer[self.position..])?;
                let mut elements = Vec::new();
                loop {
                    match nested.buffer.get(nested.position..nested.position + 2) {
                        Some([0x00, 0x00]) => {
                            nested.position += 2;
                            break;
                        }
                        Some(_) => elements.push(nested.read_value()?),
                        None => {
                            return Err(Asn1Error::MalformedInput(
                                "truncated input: missing end-of-contents marker".to_string(),
                            ));
                        }
                    }
                }
                self.position += nested.position;
                Ok(elements)
            }
        }
    }

    fn build_constructed(&self, tag: Tag, elements: Vec<Asn1Value>) -> Asn1Result<Asn1Value> {
        if tag.class() != TagClass::Universal {
            return Ok(Asn1Value::Tagged(TaggedObject::parsed_constructed(
                tag,
                elements,
                self.config.rule,
            )));
        }
        match registry::lookup(tag.number()) {
            Some(entry) => entry.from_implicit_constructed(elements, self.config.rule),
            None => Ok(Asn1Value::Unknown(UnknownValue::new(
                tag,
                UnknownContent::Constructed(elements),
            ))),
        }
    }

    fn build_primitive(&self, tag: Tag, contents: Vec<u8>) -> Asn1Result<Asn1Value> {
        if tag.class() != TagClass::Universal {
            return Ok(Asn1Value::Tagged(TaggedObject::parsed_primitive(
                tag,
                contents,
                self.config.rule,
            )));
        }
        match registry::lookup(tag.number()) {
            Some(entry) => entry.from_implicit_primitive(contents, self.config.rule),
            None => Ok(Asn1Value::Unknown(UnknownValue::new(
                tag,
                UnknownContent::Primitive(contents.into_boxed_slice()),
            ))),
        }
    }
}
