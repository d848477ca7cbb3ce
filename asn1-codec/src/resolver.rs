//! Tag checks and tagged-object resolution
//!
//! Free functions that check a tagged object's class and number and then
//! resolve its contents, each with a `context_` shortcut for the common
//! CONTEXT class and a `try_` form that yields `None` on a tag mismatch
//! instead of failing.

use crate::tag::{TagClass, tag_text};
use crate::types::TaggedObject;
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use log::debug;

fn mismatch(tagged: &TaggedObject, class: TagClass, number: u32) -> Asn1Error {
    let expected = tag_text(class.to_bits(), number);
    let found = tagged.tag_text();
    debug!("tag check failed: expected {}, found {}", expected, found);
    Asn1Error::tag_mismatch(expected, found)
}

/// Require `tagged` to carry `[class number]`
pub fn check_tag(tagged: &TaggedObject, class: TagClass, number: u32) -> Asn1Result<&TaggedObject> {
    if !tagged.has_tag(class, number) {
        return Err(mismatch(tagged, class, number));
    }
    Ok(tagged)
}

pub fn check_context_tag(tagged: &TaggedObject, number: u32) -> Asn1Result<&TaggedObject> {
    check_tag(tagged, TagClass::ContextSpecific, number)
}

/// Require `tagged` to be of class `class`, any number
pub fn check_tag_class(tagged: &TaggedObject, class: TagClass) -> Asn1Result<&TaggedObject> {
    if tagged.tag_class() != class {
        return Err(Asn1Error::tag_mismatch(class.text(), tagged.tag_class().text()));
    }
    Ok(tagged)
}

pub fn check_context_tag_class(tagged: &TaggedObject) -> Asn1Result<&TaggedObject> {
    check_tag_class(tagged, TagClass::ContextSpecific)
}

/// Check the tag, then unwrap one explicit layer
pub fn get_explicit_base_object(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
) -> Asn1Result<&Asn1Value> {
    check_tag(tagged, class, number)?.get_explicit_base_object()
}

pub fn get_explicit_context_base_object(tagged: &TaggedObject, number: u32) -> Asn1Result<&Asn1Value> {
    get_explicit_base_object(tagged, TagClass::ContextSpecific, number)
}

/// As [`get_explicit_base_object`], `None` if the tag differs
pub fn try_get_explicit_base_object(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
) -> Asn1Result<Option<&Asn1Value>> {
    if !tagged.has_tag(class, number) {
        return Ok(None);
    }
    tagged.get_explicit_base_object().map(Some)
}

pub fn try_get_explicit_context_base_object(
    tagged: &TaggedObject,
    number: u32,
) -> Asn1Result<Option<&Asn1Value>> {
    try_get_explicit_base_object(tagged, TagClass::ContextSpecific, number)
}

/// Check the tag, then unwrap one explicit layer holding a tagged object
pub fn get_explicit_base_tagged(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
) -> Asn1Result<&TaggedObject> {
    check_tag(tagged, class, number)?.get_explicit_base_tagged()
}

pub fn get_explicit_context_base_tagged(tagged: &TaggedObject, number: u32) -> Asn1Result<&TaggedObject> {
    get_explicit_base_tagged(tagged, TagClass::ContextSpecific, number)
}

pub fn try_get_explicit_base_tagged(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
) -> Asn1Result<Option<&TaggedObject>> {
    if !tagged.has_tag(class, number) {
        return Ok(None);
    }
    tagged.get_explicit_base_tagged().map(Some)
}

/// Check the tag, then reinterpret the contents as `[base_class base_number]`
pub fn get_implicit_base_tagged(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
    base_class: TagClass,
    base_number: u32,
) -> Asn1Result<TaggedObject> {
    check_tag(tagged, class, number)?.get_implicit_base_tagged(base_class, base_number)
}

pub fn get_implicit_context_base_tagged(
    tagged: &TaggedObject,
    number: u32,
    base_class: TagClass,
    base_number: u32,
) -> Asn1Result<TaggedObject> {
    get_implicit_base_tagged(tagged, TagClass::ContextSpecific, number, base_class, base_number)
}

pub fn try_get_implicit_base_tagged(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
    base_class: TagClass,
    base_number: u32,
) -> Asn1Result<Option<TaggedObject>> {
    if !tagged.has_tag(class, number) {
        return Ok(None);
    }
    tagged.get_implicit_base_tagged(base_class, base_number).map(Some)
}

/// Check the tag, then resolve the base as universal type `base_number`
pub fn get_base_universal(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
    declared_explicit: bool,
    base_number: u32,
) -> Asn1Result<Asn1Value> {
    check_tag(tagged, class, number)?.get_base_universal(declared_explicit, base_number)
}

pub fn get_context_base_universal(
    tagged: &TaggedObject,
    number: u32,
    declared_explicit: bool,
    base_number: u32,
) -> Asn1Result<Asn1Value> {
    get_base_universal(tagged, TagClass::ContextSpecific, number, declared_explicit, base_number)
}

pub fn try_get_base_universal(
    tagged: &TaggedObject,
    class: TagClass,
    number: u32,
    declared_explicit: bool,
    base_number: u32,
) -> Asn1Result<Option<Asn1Value>> {
    if !tagged.has_tag(class, number) {
        return Ok(None);
    }
    tagged.get_base_universal(declared_explicit, base_number).map(Some)
}

pub fn try_get_context_base_universal(
    tagged: &TaggedObject,
    number: u32,
    declared_explicit: bool,
    base_number: u32,
) -> Asn1Result<Option<Asn1Value>> {
    try_get_base_universal(tagged, TagClass::ContextSpecific, number, declared_explicit, base_number)
}

/// Apply `build` to `element` if it is a tagged object with `[class number]`
///
/// Returns `None` when `element` is untagged or tagged differently; this is
/// how an OPTIONAL tagged field is recognized as absent.
pub fn get_optional_tagged<'a, R>(
    element: &'a Asn1Value,
    class: TagClass,
    number: u32,
    build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
) -> Asn1Result<Option<R>> {
    match element {
        Asn1Value::Tagged(tagged) if tagged.has_tag(class, number) => build(tagged).map(Some),
        _ => Ok(None),
    }
}

pub fn get_optional_context_tagged<'a, R>(
    element: &'a Asn1Value,
    number: u32,
    build: impl FnOnce(&'a TaggedObject) -> Asn1Result<R>,
) -> Asn1Result<Option<R>> {
    get_optional_tagged(element, TagClass::ContextSpecific, number, build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::universal;
    use crate::types::{Integer, OctetString};
    use hex_literal::hex;

    fn tagged(bytes: &[u8]) -> TaggedObject {
        crate::decode(bytes).unwrap().as_tagged().cloned().unwrap()
    }

    #[test]
    fn test_check_tag_message() {
        let t = tagged(&hex!("83 01 05"));
        assert!(check_context_tag(&t, 3).is_ok());
        let err = check_tag(&t, TagClass::Application, 3).unwrap_err();
        assert_eq!(err.to_string(), "Expected [APPLICATION 3] tag but found [CONTEXT 3]");
        assert!(check_context_tag_class(&t).is_ok());
        assert!(check_tag_class(&t, TagClass::Private).is_err());
    }

    #[test]
    fn test_try_forms_yield_none_on_other_tag() {
        let t = tagged(&hex!("A0 03 02 01 05"));
        assert!(try_get_explicit_context_base_object(&t, 1).unwrap().is_none());
        let base = try_get_explicit_context_base_object(&t, 0).unwrap().unwrap();
        assert_eq!(base, &Asn1Value::from(Integer::from_i64(5)));

        assert!(try_get_context_base_universal(&t, 1, true, universal::INTEGER)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_context_base_universal() {
        let t = tagged(&hex!("80 02 AB CD"));
        let base = get_context_base_universal(&t, 0, false, universal::OCTET_STRING).unwrap();
        assert_eq!(base, OctetString::new(&[0xAB, 0xCD]).into());
        assert!(get_context_base_universal(&t, 1, false, universal::OCTET_STRING).is_err());
    }

    #[test]
    fn test_get_optional_tagged() {
        let element = crate::decode(&hex!("81 01 07")).unwrap();
        let absent = get_optional_context_tagged(&element, 0, |t| {
            t.get_base_universal(false, universal::INTEGER)
        })
        .unwrap();
        assert!(absent.is_none());

        let present = get_optional_context_tagged(&element, 1, |t| {
            t.get_base_universal(false, universal::INTEGER)
        })
        .unwrap();
        assert_eq!(present, Some(Integer::from_i64(7).into()));

        let untagged = Asn1Value::from(Integer::from_i64(1));
        assert!(get_optional_context_tagged(&untagged, 0, |_| Ok(())).unwrap().is_none());
    }
}
