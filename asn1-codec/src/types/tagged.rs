//! Tagged objects
//!
//! A non-universal tag (`[CONTEXT 0]`, `[APPLICATION 3]`, ...) wraps a base
//! value either **explicitly**, adding a constructed layer around the base's
//! own TLV, or **implicitly**, replacing the base's tag with its own. The wire
//! form alone cannot always tell the two apart, so a decoded tagged object
//! keeps its raw parse and is only interpreted once the schema says how the
//! field was declared.
//!
//! # Resolution
//!
//! | Content | declared explicit | declared implicit |
//! |---------|-------------------|-------------------|
//! | constructed, one element | unwrap the element | reinterpret the elements as the base type |
//! | constructed, other | malformed | reinterpret the elements as the base type |
//! | primitive | malformed | reinterpret the octets as the base type |
//!
//! `A3 03 02 01 05` read as `[3] EXPLICIT INTEGER` yields 5, and read as
//! `[3] IMPLICIT INTEGER` is malformed (a constructed INTEGER). `83 01 05`
//! behaves the other way round.

use crate::coerce::{Asn1Type, coercion_error};
use crate::encoding::Encoding;
use crate::registry;
use crate::tag::{Tag, TagClass, tag_text};
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result, EncodingRule};
use log::debug;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
enum TaggedContent {
    /// Built with explicit tagging
    Explicit(Box<Asn1Value>),
    /// Built with implicit tagging
    Implicit(Box<Asn1Value>),
    /// Decoded primitive contents
    ParsedPrimitive(Box<[u8]>),
    /// Decoded constructed contents
    ParsedConstructed(Vec<Asn1Value>),
}

/// Value carrying a non-universal tag
#[derive(Debug, Clone)]
pub struct TaggedObject {
    class: TagClass,
    number: u32,
    content: TaggedContent,
    /// Rule the content was decoded under; decides whether constructed
    /// string segments may be joined on reinterpretation
    rule: EncodingRule,
}

impl TaggedObject {
    /// `[class number] EXPLICIT base`
    pub fn explicit(class: TagClass, number: u32, base: Asn1Value) -> Self {
        Self {
            class,
            number,
            content: TaggedContent::Explicit(Box::new(base)),
            rule: EncodingRule::Ber,
        }
    }

    /// `[class number] IMPLICIT base`
    pub fn implicit(class: TagClass, number: u32, base: Asn1Value) -> Self {
        Self {
            class,
            number,
            content: TaggedContent::Implicit(Box::new(base)),
            rule: EncodingRule::Ber,
        }
    }

    pub fn context_explicit(number: u32, base: Asn1Value) -> Self {
        Self::explicit(TagClass::ContextSpecific, number, base)
    }

    pub fn context_implicit(number: u32, base: Asn1Value) -> Self {
        Self::implicit(TagClass::ContextSpecific, number, base)
    }

    pub(crate) fn parsed_primitive(tag: Tag, contents: Vec<u8>, rule: EncodingRule) -> Self {
        Self {
            class: tag.class(),
            number: tag.number(),
            content: TaggedContent::ParsedPrimitive(contents.into_boxed_slice()),
            rule,
        }
    }

    pub(crate) fn parsed_constructed(tag: Tag, elements: Vec<Asn1Value>, rule: EncodingRule) -> Self {
        Self {
            class: tag.class(),
            number: tag.number(),
            content: TaggedContent::ParsedConstructed(elements),
            rule,
        }
    }

    pub fn tag_class(&self) -> TagClass {
        self.class
    }

    pub fn tag_number(&self) -> u32 {
        self.number
    }

    /// Full tag including the constructed bit of the encoded form
    pub fn tag(&self) -> Tag {
        Tag::new(self.class, self.is_constructed(), self.number)
    }

    pub fn has_tag(&self, class: TagClass, number: u32) -> bool {
        self.class == class && self.number == number
    }

    pub fn has_context_tag(&self, number: u32) -> bool {
        self.has_tag(TagClass::ContextSpecific, number)
    }

    pub fn is_constructed(&self) -> bool {
        match &self.content {
            TaggedContent::Explicit(_) | TaggedContent::ParsedConstructed(_) => true,
            TaggedContent::Implicit(base) => base.tag().is_constructed(),
            TaggedContent::ParsedPrimitive(_) => false,
        }
    }

    /// Could this object be an explicit tagging? True for declared explicit
    /// objects and for parsed constructed objects with exactly one element.
    pub fn is_explicit(&self) -> bool {
        match &self.content {
            TaggedContent::Explicit(_) => true,
            TaggedContent::ParsedConstructed(elements) => elements.len() == 1,
            _ => false,
        }
    }

    /// Was this object produced by the decoder?
    pub fn is_parsed(&self) -> bool {
        matches!(
            &self.content,
            TaggedContent::ParsedPrimitive(_) | TaggedContent::ParsedConstructed(_)
        )
    }

    /// `[CONTEXT 3]`-style text of this object's tag
    pub fn tag_text(&self) -> String {
        tag_text(self.class.to_bits(), self.number)
    }

    /// Unwrap one explicit layer
    ///
    /// # Errors
    /// - `MalformedInput` if parsed contents are not a single element
    /// - `SchemaContract` if the object was built with implicit tagging
    pub fn get_explicit_base_object(&self) -> Asn1Result<&Asn1Value> {
        match &self.content {
            TaggedContent::Explicit(base) => Ok(base),
            TaggedContent::ParsedConstructed(elements) if elements.len() == 1 => Ok(&elements[0]),
            TaggedContent::Implicit(_) => Err(Asn1Error::SchemaContract(format!(
                "{} built with implicit tagging - explicit expected",
                self.tag_text()
            ))),
            _ => {
                debug!("{} is not an explicit tagging", self.tag_text());
                Err(Asn1Error::MalformedInput(format!(
                    "object {} implicit - explicit expected",
                    self.tag_text()
                )))
            }
        }
    }

    /// Unwrap one explicit layer whose base is itself a tagged object
    pub fn get_explicit_base_tagged(&self) -> Asn1Result<&TaggedObject> {
        match self.get_explicit_base_object()? {
            Asn1Value::Tagged(inner) => Ok(inner),
            other => Err(Asn1Error::MalformedInput(format!(
                "unexpected object in {}: expected tagged object, found {}",
                self.tag_text(),
                other.tag()
            ))),
        }
    }

    /// Reinterpret the contents as `[base_class base_number]` (implicit
    /// tagging of a tagged type)
    pub fn get_implicit_base_tagged(
        &self,
        base_class: TagClass,
        base_number: u32,
    ) -> Asn1Result<TaggedObject> {
        match &self.content {
            TaggedContent::Explicit(_) => Err(Asn1Error::SchemaContract(format!(
                "{} built with explicit tagging - implicit expected",
                self.tag_text()
            ))),
            TaggedContent::Implicit(base) => match base.as_ref() {
                Asn1Value::Tagged(inner) if inner.has_tag(base_class, base_number) => {
                    Ok(inner.clone())
                }
                other => Err(Asn1Error::tag_mismatch(
                    tag_text(base_class.to_bits(), base_number),
                    other.tag().to_string(),
                )),
            },
            parsed => Ok(TaggedObject {
                class: base_class,
                number: base_number,
                content: parsed.clone(),
                rule: self.rule,
            }),
        }
    }

    /// Resolve the base value as universal type `number`
    ///
    /// With `declared_explicit` the single nested element is returned and
    /// must carry that universal tag. Otherwise the contents are
    /// reinterpreted as that type through the universal type registry.
    pub fn get_base_universal(&self, declared_explicit: bool, number: u32) -> Asn1Result<Asn1Value> {
        if declared_explicit {
            let base = self.get_explicit_base_object()?;
            if !base.tag().is_universal(number) {
                return Err(Asn1Error::tag_mismatch(
                    tag_text(TagClass::Universal.to_bits(), number),
                    base.tag().to_string(),
                ));
            }
            return Ok(base.clone());
        }

        let entry = registry::lookup(number).ok_or_else(|| {
            Asn1Error::SchemaContract(format!(
                "no universal type registered for tag number {}",
                number
            ))
        })?;

        match &self.content {
            TaggedContent::ParsedPrimitive(contents) => {
                entry.from_implicit_primitive(contents.to_vec(), self.rule)
            }
            TaggedContent::ParsedConstructed(elements) => {
                entry.from_implicit_constructed(elements.clone(), self.rule)
            }
            TaggedContent::Explicit(base) => {
                entry.from_implicit_constructed(vec![base.as_ref().clone()], self.rule)
            }
            TaggedContent::Implicit(base) => {
                if base.tag().is_universal(number) {
                    Ok(base.as_ref().clone())
                } else {
                    Err(Asn1Error::tag_mismatch(
                        tag_text(TagClass::Universal.to_bits(), number),
                        base.tag().to_string(),
                    ))
                }
            }
        }
    }

    pub(crate) fn encoding(&self, rule: EncodingRule) -> Encoding<'_> {
        let tag = self.tag();
        match &self.content {
            TaggedContent::Explicit(base) => {
                Encoding::constructed(tag, vec![base.encoding(rule)], rule.allows_indefinite())
            }
            TaggedContent::Implicit(base) => base.encoding(rule).retag(self.class, self.number),
            TaggedContent::ParsedPrimitive(contents) => Encoding::primitive(tag, &contents[..]),
            TaggedContent::ParsedConstructed(elements) => Encoding::constructed(
                tag,
                elements.iter().map(|e| e.encoding(rule)).collect(),
                rule.allows_indefinite(),
            ),
        }
    }

    /// DER contents octets; the wire-level identity of this object
    fn canonical_contents(&self) -> Vec<u8> {
        self.encoding(EncodingRule::Der).contents_to_vec()
    }
}

/// Two tagged objects are equal when they put the same tag and the same DER
/// contents on the wire, however they were built or decoded.
impl PartialEq for TaggedObject {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.number == other.number
            && self.is_constructed() == other.is_constructed()
            && self.canonical_contents() == other.canonical_contents()
    }
}

impl Eq for TaggedObject {}

impl Hash for TaggedObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        self.number.hash(state);
        self.is_constructed().hash(state);
        self.canonical_contents().hash(state);
    }
}

impl fmt::Display for TaggedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_text())?;
        match &self.content {
            TaggedContent::Explicit(base) | TaggedContent::Implicit(base) => write!(f, "{}", base),
            TaggedContent::ParsedPrimitive(contents) => {
                f.write_str("#")?;
                for b in contents.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            TaggedContent::ParsedConstructed(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Asn1Type for TaggedObject {
    const TYPE_NAME: &'static str = "tagged object";

    fn is_instance(value: &Asn1Value) -> bool {
        matches!(value, Asn1Value::Tagged(_))
    }

    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self> {
        match value {
            Asn1Value::Tagged(tagged) => Ok(tagged.clone()),
            other => Err(coercion_error(Self::TYPE_NAME, other)),
        }
    }
}

impl From<TaggedObject> for Asn1Value {
    fn from(value: TaggedObject) -> Self {
        Asn1Value::Tagged(value)
    }
}
