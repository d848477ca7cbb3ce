//! Encoded form of a value
//!
//! An [`Encoding`] is the intermediate tree produced from a value for one
//! encoding rule. Contents lengths are computed once, bottom-up, when the tree
//! is built, so writing is a single forward pass with no back-patching.

use crate::length::{INDEFINITE, Length};
use crate::tag::{Tag, TagClass};
use bytes::BufMut;
use std::borrow::Cow;

/// End-of-contents marker closing an indefinite-length value
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

/// Encoded form of one TLV unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding<'a> {
    /// Tag, length and raw contents octets
    Primitive { tag: Tag, contents: Cow<'a, [u8]> },
    /// Tag, length and nested encodings
    Constructed {
        tag: Tag,
        indefinite: bool,
        contents_len: usize,
        elements: Vec<Encoding<'a>>,
    },
}

impl<'a> Encoding<'a> {
    /// Primitive encoding; the constructed bit of `tag` is cleared
    pub fn primitive(tag: Tag, contents: impl Into<Cow<'a, [u8]>>) -> Self {
        Encoding::Primitive {
            tag: tag.with_constructed(false),
            contents: contents.into(),
        }
    }

    /// Constructed encoding; `indefinite` selects the `0x80` length form
    pub fn constructed(tag: Tag, elements: Vec<Encoding<'a>>, indefinite: bool) -> Self {
        let contents_len = elements.iter().map(Encoding::encoded_len).sum();
        Encoding::Constructed {
            tag: tag.with_constructed(true),
            indefinite,
            contents_len,
            elements,
        }
    }

    /// Constructed encoding with elements sorted by their encoded octets
    pub fn constructed_sorted(tag: Tag, mut elements: Vec<Encoding<'a>>, indefinite: bool) -> Self {
        elements.sort_by_cached_key(Encoding::to_vec);
        Self::constructed(tag, elements, indefinite)
    }

    /// Tag of this unit
    pub fn tag(&self) -> Tag {
        match self {
            Encoding::Primitive { tag, .. } | Encoding::Constructed { tag, .. } => *tag,
        }
    }

    /// Replace class and number, keeping the constructed bit (implicit tagging)
    pub fn retag(self, class: TagClass, number: u32) -> Self {
        match self {
            Encoding::Primitive { tag, contents } => Encoding::Primitive {
                tag: Tag::new(class, tag.is_constructed(), number),
                contents,
            },
            Encoding::Constructed {
                tag,
                indefinite,
                contents_len,
                elements,
            } => Encoding::Constructed {
                tag: Tag::new(class, tag.is_constructed(), number),
                indefinite,
                contents_len,
                elements,
            },
        }
    }

    /// Number of contents octets, excluding any end-of-contents marker
    pub fn contents_len(&self) -> usize {
        match self {
            Encoding::Primitive { contents, .. } => contents.len(),
            Encoding::Constructed { contents_len, .. } => *contents_len,
        }
    }

    /// Total number of octets this unit occupies
    pub fn encoded_len(&self) -> usize {
        match self {
            Encoding::Primitive { tag, contents } => {
                tag.encoded_len() + Length::encoded_len(contents.len()) + contents.len()
            }
            Encoding::Constructed {
                tag,
                indefinite: true,
                contents_len,
                ..
            } => tag.encoded_len() + 1 + contents_len + END_OF_CONTENTS.len(),
            Encoding::Constructed {
                tag,
                indefinite: false,
                contents_len,
                ..
            } => tag.encoded_len() + Length::encoded_len(*contents_len) + contents_len,
        }
    }

    /// Write the full TLV unit
    pub fn write_to<B: BufMut>(&self, out: &mut B) {
        match self {
            Encoding::Primitive { tag, contents } => {
                tag.write_to(out);
                Length::write_definite(contents.len(), out);
                out.put_slice(contents);
            }
            Encoding::Constructed {
                tag,
                indefinite,
                contents_len,
                elements,
            } => {
                tag.write_to(out);
                if *indefinite {
                    out.put_u8(INDEFINITE);
                } else {
                    Length::write_definite(*contents_len, out);
                }
                for element in elements {
                    element.write_to(out);
                }
                if *indefinite {
                    out.put_slice(&END_OF_CONTENTS);
                }
            }
        }
    }

    /// Write only the contents octets
    pub fn write_contents_to<B: BufMut>(&self, out: &mut B) {
        match self {
            Encoding::Primitive { contents, .. } => out.put_slice(contents),
            Encoding::Constructed { elements, .. } => {
                for element in elements {
                    element.write_to(out);
                }
            }
        }
    }

    /// Encode into a fresh buffer
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Contents octets in a fresh buffer
    pub fn contents_to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.contents_len());
        self.write_contents_to(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::universal;

    #[test]
    fn test_primitive_encoding() {
        let enc = Encoding::primitive(Tag::universal(false, universal::OCTET_STRING), &[0xAB][..]);
        assert_eq!(enc.encoded_len(), 3);
        assert_eq!(enc.to_vec(), vec![0x04, 0x01, 0xAB]);
    }

    #[test]
    fn test_constructed_definite() {
        let inner = Encoding::primitive(Tag::universal(false, universal::NULL), Vec::new());
        let enc = Encoding::constructed(Tag::universal(true, universal::SEQUENCE), vec![inner], false);
        assert_eq!(enc.contents_len(), 2);
        assert_eq!(enc.to_vec(), vec![0x30, 0x02, 0x05, 0x00]);
    }

    #[test]
    fn test_constructed_indefinite() {
        let inner = Encoding::primitive(Tag::universal(false, universal::NULL), Vec::new());
        let enc = Encoding::constructed(Tag::universal(true, universal::SEQUENCE), vec![inner], true);
        let bytes = enc.to_vec();
        assert_eq!(bytes, vec![0x30, 0x80, 0x05, 0x00, 0x00, 0x00]);
        assert_eq!(bytes.len(), enc.encoded_len());
    }

    #[test]
    fn test_sorted_elements() {
        let a = Encoding::primitive(Tag::universal(false, universal::INTEGER), vec![0x02]);
        let b = Encoding::primitive(Tag::universal(false, universal::BOOLEAN), vec![0xFF]);
        let enc = Encoding::constructed_sorted(Tag::universal(true, universal::SET), vec![a, b], false);
        assert_eq!(enc.to_vec(), vec![0x31, 0x06, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn test_retag_keeps_constructed_bit() {
        let inner = Encoding::primitive(Tag::universal(false, universal::NULL), Vec::new());
        let enc = Encoding::constructed(Tag::universal(true, universal::SEQUENCE), vec![inner], false)
            .retag(TagClass::ContextSpecific, 1);
        assert_eq!(enc.to_vec(), vec![0xA1, 0x02, 0x05, 0x00]);
    }
}
