//! SEQUENCE and SET

use crate::coerce::universal_type;
use crate::cursor::SequenceCursor;
use crate::encoding::Encoding;
use crate::tag::{Tag, universal};
use crate::value::Asn1Value;
use asn1_core::EncodingRule;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Ordered collection of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    elements: Vec<Asn1Value>,
}

impl Sequence {
    pub fn new(elements: Vec<Asn1Value>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Asn1Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asn1Value> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[Asn1Value] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Asn1Value> {
        self.elements
    }

    /// Positional reader over the elements
    pub fn cursor(&self) -> SequenceCursor<'_> {
        SequenceCursor::new(self)
    }

    pub(crate) fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        let elements = self.elements.iter().map(|e| e.encoding(rule)).collect();
        Encoding::constructed(
            Tag::universal(true, universal::SEQUENCE),
            elements,
            rule.allows_indefinite(),
        )
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Asn1Value;
    type IntoIter = std::slice::Iter<'a, Asn1Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<Asn1Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Asn1Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.elements, f)
    }
}

universal_type!(Sequence, Sequence, "SEQUENCE", universal::SEQUENCE);

/// Unordered collection of values
///
/// Elements keep the order they were given or decoded in. Under DER the
/// encoder writes them sorted by their encoded octets. Equality ignores
/// element order: two sets are equal when they hold the same DER element
/// encodings.
#[derive(Debug, Clone, Default)]
pub struct Set {
    elements: Vec<Asn1Value>,
}

impl Set {
    pub fn new(elements: Vec<Asn1Value>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Asn1Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asn1Value> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[Asn1Value] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Asn1Value> {
        self.elements
    }

    /// Element DER encodings in DER SET order
    fn canonical_elements(&self) -> Vec<Vec<u8>> {
        let mut encoded: Vec<Vec<u8>> = self.elements.iter().map(Asn1Value::to_der).collect();
        encoded.sort();
        encoded
    }

    pub(crate) fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        let tag = Tag::universal(true, universal::SET);
        let elements = self.elements.iter().map(|e| e.encoding(rule)).collect();
        if rule.sorts_set_elements() {
            Encoding::constructed_sorted(tag, elements, false)
        } else {
            Encoding::constructed(tag, elements, rule.allows_indefinite())
        }
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.elements.len() == other.elements.len()
            && self.canonical_elements() == other.canonical_elements()
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_elements().hash(state);
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Asn1Value;
    type IntoIter = std::slice::Iter<'a, Asn1Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<Asn1Value> for Set {
    fn from_iter<I: IntoIterator<Item = Asn1Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.elements, f)
    }
}

universal_type!(Set, Set, "SET", universal::SET);

fn fmt_elements(elements: &[Asn1Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", element)?;
    }
    f.write_str("]")
}
