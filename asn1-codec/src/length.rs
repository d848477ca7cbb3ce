//! Length octets
//!
//! # Encoding Format
//!
//! - Short form (0-127): a single byte with bit 8 = 0
//! - Long form (>127): first byte = 0x80 | number_of_length_bytes, followed by
//!   the length in big-endian order
//! - Indefinite form: the single byte 0x80; contents run until an
//!   end-of-contents marker (`00 00`). BER only.

use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use bytes::BufMut;
use log::warn;

/// Indefinite length marker
pub const INDEFINITE: u8 = 0x80;

/// Decoded length of a TLV unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Content length is known up front
    Definite(usize),
    /// Content ends at an end-of-contents marker
    Indefinite,
}

impl Length {
    /// Number of length octets needed for a definite length
    pub fn encoded_len(length: usize) -> usize {
        if length < 128 {
            1
        } else {
            1 + significant_bytes(length)
        }
    }

    /// Write a definite length in its shortest form
    pub fn write_definite<B: BufMut>(length: usize, out: &mut B) {
        if length < 128 {
            out.put_u8(length as u8);
            return;
        }

        let num_bytes = significant_bytes(length);
        out.put_u8(0x80 | num_bytes as u8);
        for i in (0..num_bytes).rev() {
            out.put_u8(((length >> (i * 8)) & 0xFF) as u8);
        }
    }

    /// Decode length octets under the given rule
    ///
    /// # Returns
    /// Returns `Ok((Length, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns `MalformedInput` if:
    /// - Buffer is too short
    /// - The reserved value `0xFF` is used
    /// - The indefinite form is used and the rule does not allow it
    /// - The long form is not minimal and the rule requires it (DER)
    /// - The value does not fit in `usize`
    pub fn decode(data: &[u8], rule: EncodingRule) -> Asn1Result<(Self, usize)> {
        let first_byte = *data.first().ok_or_else(|| {
            Asn1Error::MalformedInput("truncated input: missing length octet".to_string())
        })?;

        if first_byte & 0x80 == 0 {
            return Ok((Length::Definite(first_byte as usize), 1));
        }

        if first_byte == INDEFINITE {
            if !rule.allows_indefinite() {
                return Err(Asn1Error::MalformedInput(format!(
                    "indefinite length not allowed under {}",
                    rule
                )));
            }
            return Ok((Length::Indefinite, 1));
        }

        if first_byte == 0xFF {
            return Err(Asn1Error::MalformedInput(
                "reserved length octet 0xFF".to_string(),
            ));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        let octets = data.get(1..1 + num_bytes).ok_or_else(|| {
            Asn1Error::MalformedInput(format!(
                "truncated input: need {} length octets, have {}",
                num_bytes,
                data.len().saturating_sub(1)
            ))
        })?;

        let significant = octets.iter().skip_while(|b| **b == 0).count();
        if significant > std::mem::size_of::<usize>() {
            return Err(Asn1Error::MalformedInput(format!(
                "length encoding too large: {} significant bytes",
                significant
            )));
        }

        let length = octets
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | *b as usize);

        let minimal = octets[0] != 0 && length >= 128;
        if !minimal {
            if rule.requires_minimal_length() {
                return Err(Asn1Error::MalformedInput(format!(
                    "non-minimal length encoding of {} under {}",
                    length, rule
                )));
            }
            warn!("accepting non-minimal length encoding of {} under {}", length, rule);
        }

        Ok((Length::Definite(length), 1 + num_bytes))
    }
}

fn significant_bytes(length: usize) -> usize {
    let bits = usize::BITS - length.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}
