//! CHOICE dispatch
//!
//! An untagged CHOICE has no tag of its own; the chosen alternative is
//! recognized by the tag of the value itself. Alternatives are tried in
//! declared order and the first one that recognizes the value wins.
//!
//! Tagging a CHOICE is always explicit (X.680 30.6, 30.8): an implicit tag
//! would replace the very tag that selects the alternative. Asking for
//! implicit resolution of a choice is therefore a schema error, not a decode
//! error.

use crate::coerce::Asn1Input;
use crate::tag::TagClass;
use crate::types::TaggedObject;
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use log::debug;

/// One alternative: `Some` if it recognizes the value, `None` to pass
pub type Alternative<T> = fn(&Asn1Value) -> Asn1Result<Option<T>>;

/// An untagged CHOICE type
pub trait Asn1Choice: Sized + 'static {
    /// Name used in diagnostics
    const TYPE_NAME: &'static str;

    /// Alternatives in declared order
    const ALTERNATIVES: &'static [Alternative<Self>];
}

/// Try each alternative in order; `None` if none matches
pub fn dispatch<T: Asn1Choice>(value: &Asn1Value) -> Asn1Result<Option<T>> {
    for alternative in T::ALTERNATIVES {
        if let Some(chosen) = alternative(value)? {
            return Ok(Some(chosen));
        }
    }
    Ok(None)
}

fn no_alternative<T: Asn1Choice>(value: &Asn1Value) -> Asn1Error {
    debug!("no {} alternative for {}", T::TYPE_NAME, value.tag());
    Asn1Error::TypeCoercion(format!(
        "unknown object in {}: {}",
        T::TYPE_NAME,
        value.type_name()
    ))
}

/// Coerce any accepted input to the choice `T`
pub fn get_choice_instance<T: Asn1Choice>(input: Asn1Input<'_, T>) -> Asn1Result<T> {
    match input {
        Asn1Input::Typed(typed) => Ok(typed),
        Asn1Input::Value(value) => dispatch(value)?.ok_or_else(|| no_alternative::<T>(value)),
        Asn1Input::Bytes(bytes) => {
            let value = crate::decode(bytes).map_err(|e| {
                Asn1Error::TypeCoercion(format!(
                    "failed to construct {} from byte array: {}",
                    T::TYPE_NAME,
                    e
                ))
            })?;
            dispatch(&value)?.ok_or_else(|| no_alternative::<T>(&value))
        }
    }
}

/// `Some(T)` if an alternative recognizes `element`, `None` otherwise
pub fn get_optional_choice<T: Asn1Choice>(element: &Asn1Value) -> Asn1Result<Option<T>> {
    dispatch(element)
}

/// Resolve a tagged object holding the choice `T`
///
/// # Errors
/// Returns `SchemaContract` when `declared_explicit` is false.
pub fn get_tagged_choice<T: Asn1Choice>(tagged: &TaggedObject, declared_explicit: bool) -> Asn1Result<T> {
    if !declared_explicit {
        return Err(Asn1Error::SchemaContract(format!(
            "Implicit tagging cannot be used with untagged choice type {} (X.680 30.6, 30.8).",
            T::TYPE_NAME
        )));
    }
    let base = tagged.get_explicit_base_object()?;
    dispatch(base)?.ok_or_else(|| no_alternative::<T>(base))
}

/// As [`get_tagged_choice`], additionally requiring the CONTEXT class
pub fn get_context_tagged_choice<T: Asn1Choice>(
    tagged: &TaggedObject,
    declared_explicit: bool,
) -> Asn1Result<T> {
    if tagged.tag_class() != TagClass::ContextSpecific {
        return Err(Asn1Error::tag_mismatch(
            TagClass::ContextSpecific.text(),
            tagged.tag_class().text(),
        ));
    }
    get_tagged_choice(tagged, declared_explicit)
}
