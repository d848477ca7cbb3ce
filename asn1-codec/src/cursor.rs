//! Positional SEQUENCE parsing
//!
//! A [`SequenceCursor`] walks a decoded SEQUENCE field by field. Optional
//! fields are matched by tag and, when absent, leave the position where it
//! is so the next field sees the same element.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_codec::coerce::{get_instance, get_optional, get_tagged, Asn1Input};
//! use asn1_codec::types::{Integer, OctetString, Sequence};
//!
//! // SEQUENCE { version INTEGER, tag [0] IMPLICIT INTEGER OPTIONAL, data OCTET STRING }
//! let bytes = [0x30, 0x06, 0x02, 0x01, 0x01, 0x04, 0x01, 0xAA];
//! let seq: Sequence = get_instance(Asn1Input::Bytes(&bytes))?;
//! let mut cursor = seq.cursor();
//!
//! let version: Integer = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
//! let tag: Option<Integer> = cursor.read_optional_context_tagged(0, |t| get_tagged(t, false))?;
//! let data: OctetString = cursor.read(|v| get_instance(Asn1Input::Value(v)))?;
//! cursor.finish()?;
//!
//! assert_eq!(version.to_i64(), Some(1));
//! assert!(tag.is_none());
//! assert_eq!(data.octets(), &[0xAA]);
//! # Ok::<(), asn1_codec::Asn1Error>(())
//! ```

use crate::resolver::check_tag;
use crate::tag::{TagClass, tag_text};
use crate::types::{Sequence, TaggedObject};
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use log::debug;

/// Reader over the elements of a SEQUENCE
#[derive(Debug, Clone)]
pub struct SequenceCursor<'a> {
    sequence: &'a Sequence,
    position: usize,
}

impl<'a> SequenceCursor<'a> {
    pub fn new(sequence: &'a Sequence) -> Self {
        Self {
            sequence,
            position: 0,
        }
    }

    /// Index of the next unread element
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread elements
    pub fn remaining(&self) -> usize {
        self.sequence.len() - self.position
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Next element without consuming it
    pub fn peek(&self) -> Option<&'a Asn1Value> {
        self.sequence.get(self.position)
    }

    fn required(&self) -> Asn1Result<&'a Asn1Value> {
        self.peek().ok_or_else(|| {
            debug!("sequence ended at position {}", self.position);
            Asn1Error::MalformedInput(format!(
                "sequence too short: no element at position {}",
                self.position
            ))
        })
    }

    /// Consume a required untagged element
    pub fn read<R>(&mut self, build: impl FnOnce(&'a Asn1Value) -> Asn1Result<R>) -> Asn1Result<R> {
        let element = self.required()?;
        let result = build(element)?;
        self.position += 1;
        Ok(result)
    }

    /// Consume a required element tagged `[class number]`
    pub fn read_tagged<R>(
        &mut self,
        class: TagClass,
        number: u32,
        build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
    ) -> Asn1Result<R> {
        let element = self.required()?;
        let tagged = match element {
            Asn1Value::Tagged(tagged) => check_tag(tagged, class, number)?,
            other => {
                return Err(Asn1Error::tag_mismatch(
                    tag_text(class.to_bits(), number),
                    other.tag().to_string(),
                ));
            }
        };
        let result = build(tagged)?;
        self.position += 1;
        Ok(result)
    }

    pub fn read_context_tagged<R>(
        &mut self,
        number: u32,
        build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
    ) -> Asn1Result<R> {
        self.read_tagged(TagClass::ContextSpecific, number, build)
    }

    /// Consume the next element if `build` accepts it
    ///
    /// `build` returns `None` to signal absence (typically via
    /// [`crate::coerce::get_optional`]); the position is then left unchanged.
    pub fn read_optional<R>(
        &mut self,
        build: impl FnOnce(&'a Asn1Value) -> Asn1Result<Option<R>>,
    ) -> Asn1Result<Option<R>> {
        let Some(element) = self.peek() else {
            return Ok(None);
        };
        let result = build(element)?;
        if result.is_some() {
            self.position += 1;
        }
        Ok(result)
    }

    /// Consume the next element only if it is tagged `[class number]`
    pub fn read_optional_tagged<R>(
        &mut self,
        class: TagClass,
        number: u32,
        build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
    ) -> Asn1Result<Option<R>> {
        match self.peek() {
            Some(Asn1Value::Tagged(tagged)) if tagged.has_tag(class, number) => {
                let result = build(tagged)?;
                self.position += 1;
                Ok(Some(result))
            }
            _ => {
                debug!(
                    "optional {} absent at position {}",
                    tag_text(class.to_bits(), number),
                    self.position
                );
                Ok(None)
            }
        }
    }

    pub fn read_optional_context_tagged<R>(
        &mut self,
        number: u32,
        build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
    ) -> Asn1Result<Option<R>> {
        self.read_optional_tagged(TagClass::ContextSpecific, number, build)
    }

    /// Require every element to have been consumed
    pub fn finish(self) -> Asn1Result<()> {
        if self.remaining() > 0 {
            debug!(
                "{} unexpected elements after position {}",
                self.remaining(),
                self.position
            );
            return Err(Asn1Error::MalformedInput(format!(
                "unexpected elements in sequence: {} left after position {}",
                self.remaining(),
                self.position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{Asn1Input, get_instance, get_optional, get_tagged};
    use crate::types::{Boolean, Integer, OctetString};
    use hex_literal::hex;

    fn sequence(bytes: &[u8]) -> Sequence {
        get_instance(Asn1Input::Bytes(bytes)).unwrap()
    }

    #[test]
    fn test_absent_optional_keeps_position() {
        // SEQUENCE { a INTEGER, b [0] INTEGER OPTIONAL, c [1] INTEGER }, b absent
        let seq = sequence(&hex!("30 06 02 01 01 81 01 03"));
        let mut cursor = seq.cursor();

        let a: Integer = cursor.read(|v| get_instance(Asn1Input::Value(v))).unwrap();
        assert_eq!(a.to_i64(), Some(1));

        let b: Option<Integer> = cursor
            .read_optional_context_tagged(0, |t| get_tagged(t, false))
            .unwrap();
        assert!(b.is_none());
        assert_eq!(cursor.position(), 1);

        let c: Integer = cursor.read_context_tagged(1, |t| get_tagged(t, false)).unwrap();
        assert_eq!(c.to_i64(), Some(3));
        assert_eq!(cursor.position(), 2);
        cursor.finish().unwrap();
    }

    #[test]
    fn test_read_tagged_mismatch() {
        let seq = sequence(&hex!("30 03 81 01 03"));
        let mut cursor = seq.cursor();
        let err = cursor
            .read_context_tagged(0, |t| get_tagged::<Integer>(t, false))
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected [CONTEXT 0] tag but found [CONTEXT 1]");
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_tagged_on_untagged_element() {
        let seq = sequence(&hex!("30 03 02 01 01"));
        let mut cursor = seq.cursor();
        let err = cursor
            .read_context_tagged(3, |t| get_tagged::<Integer>(t, false))
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected [CONTEXT 3] tag but found [UNIVERSAL 2]");
    }

    #[test]
    fn test_read_past_end() {
        let seq = sequence(&hex!("30 00"));
        let mut cursor = seq.cursor();
        let result: Asn1Result<Integer> = cursor.read(|v| get_instance(Asn1Input::Value(v)));
        assert!(matches!(result, Err(Asn1Error::MalformedInput(_))));

        let optional: Option<Boolean> = cursor.read_optional(get_optional).unwrap();
        assert!(optional.is_none());
    }

    #[test]
    fn test_read_optional_by_type() {
        // SEQUENCE { critical BOOLEAN DEFAULT FALSE, value OCTET STRING }
        let seq = sequence(&hex!("30 03 04 01 AA"));
        let mut cursor = seq.cursor();
        let critical: Option<Boolean> = cursor.read_optional(get_optional).unwrap();
        assert!(critical.is_none());
        let value: OctetString = cursor.read(|v| get_instance(Asn1Input::Value(v))).unwrap();
        assert_eq!(value.octets(), &[0xAA]);
        assert!(cursor.is_finished());
    }

    #[test]
    fn test_finish_with_leftovers() {
        let seq = sequence(&hex!("30 06 02 01 01 02 01 02"));
        let mut cursor = seq.cursor();
        let _: Integer = cursor.read(|v| get_instance(Asn1Input::Value(v))).unwrap();
        assert_eq!(cursor.remaining(), 1);
        assert!(matches!(cursor.finish(), Err(Asn1Error::MalformedInput(_))));
    }
}
