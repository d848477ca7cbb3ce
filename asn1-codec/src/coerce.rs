//! Type coercion
//!
//! Every value type can be built from a value of its own type, from a generic
//! decoded [`Asn1Value`], or from encoded bytes; and from a tagged object
//! given the schema's explicit/implicit declaration. Coercion never guesses:
//! an input of the wrong shape is a `TypeCoercion` error, not a best effort.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_codec::coerce::{get_instance, Asn1Input};
//! use asn1_codec::types::Integer;
//!
//! let n: Integer = get_instance(Asn1Input::Bytes(&[0x02, 0x01, 0x05]))?;
//! assert_eq!(n.to_i64(), Some(5));
//! # Ok::<(), asn1_core::Asn1Error>(())
//! ```

use crate::tag::TagClass;
use crate::types::TaggedObject;
use crate::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use log::debug;

/// A type that can be coerced out of a generic value
pub trait Asn1Type: Sized {
    /// Name used in diagnostics
    const TYPE_NAME: &'static str;

    /// Does `value` already hold this type?
    fn is_instance(value: &Asn1Value) -> bool;

    /// Coerce a generic value; `TypeCoercion` if it is of another type
    fn try_from_value(value: &Asn1Value) -> Asn1Result<Self>;

    /// Decode one complete TLV unit and coerce it
    fn from_bytes(bytes: &[u8]) -> Asn1Result<Self> {
        let value = crate::decode(bytes).map_err(|e| {
            Asn1Error::TypeCoercion(format!(
                "failed to construct {} from byte array: {}",
                Self::TYPE_NAME,
                e
            ))
        })?;
        Self::try_from_value(&value)
    }
}

/// A type with a universal tag number
pub trait UniversalType: Asn1Type {
    const TAG_NUMBER: u32;
}

/// The accepted inputs of [`get_instance`]
#[derive(Debug)]
pub enum Asn1Input<'a, T> {
    /// Already the requested type; passed through
    Typed(T),
    /// A generic decoded value
    Value(&'a Asn1Value),
    /// One complete encoded TLV unit
    Bytes(&'a [u8]),
}

impl<'a, T> From<&'a Asn1Value> for Asn1Input<'a, T> {
    fn from(value: &'a Asn1Value) -> Self {
        Asn1Input::Value(value)
    }
}

impl<'a, T> From<&'a [u8]> for Asn1Input<'a, T> {
    fn from(bytes: &'a [u8]) -> Self {
        Asn1Input::Bytes(bytes)
    }
}

/// Error for a value of the wrong type
pub fn coercion_error(type_name: &str, found: &Asn1Value) -> Asn1Error {
    debug!("cannot coerce {} to {}", found.type_name(), type_name);
    Asn1Error::TypeCoercion(format!(
        "illegal object in get_instance: expected {}, found {}",
        type_name,
        found.type_name()
    ))
}

/// Coerce any accepted input to `T`
pub fn get_instance<T: Asn1Type>(input: Asn1Input<'_, T>) -> Asn1Result<T> {
    match input {
        Asn1Input::Typed(typed) => Ok(typed),
        Asn1Input::Value(value) => T::try_from_value(value),
        Asn1Input::Bytes(bytes) => T::from_bytes(bytes),
    }
}

/// `Some(T)` when `element` already is a `T`, `None` otherwise
///
/// Used for OPTIONAL fields whose presence is decided by the element's type.
pub fn get_optional<T: Asn1Type>(element: &Asn1Value) -> Asn1Result<Option<T>> {
    if T::is_instance(element) {
        T::try_from_value(element).map(Some)
    } else {
        Ok(None)
    }
}

/// Resolve a tagged object to the universal type `T`
///
/// `declared_explicit` is the schema's declaration; it decides whether the
/// content is unwrapped once or reinterpreted as `T` directly.
pub fn get_tagged<T: UniversalType>(tagged: &TaggedObject, declared_explicit: bool) -> Asn1Result<T> {
    let base = tagged.get_base_universal(declared_explicit, T::TAG_NUMBER)?;
    T::try_from_value(&base)
}

/// As [`get_tagged`], additionally requiring the CONTEXT class
pub fn get_context_tagged<T: UniversalType>(
    tagged: &TaggedObject,
    declared_explicit: bool,
) -> Asn1Result<T> {
    if tagged.tag_class() != TagClass::ContextSpecific {
        return Err(Asn1Error::tag_mismatch(
            TagClass::ContextSpecific.text(),
            tagged.tag_class().text(),
        ));
    }
    get_tagged(tagged, declared_explicit)
}

/// Implements [`Asn1Type`], [`UniversalType`] and `From<T> for Asn1Value` for
/// a type stored directly in an [`Asn1Value`] variant
macro_rules! universal_type {
    ($ty:ident, $variant:ident, $name:literal, $number:expr) => {
        impl $crate::coerce::Asn1Type for $ty {
            const TYPE_NAME: &'static str = $name;

            fn is_instance(value: &$crate::value::Asn1Value) -> bool {
                matches!(value, $crate::value::Asn1Value::$variant(_))
            }

            fn try_from_value(
                value: &$crate::value::Asn1Value,
            ) -> asn1_core::Asn1Result<Self> {
                match value {
                    $crate::value::Asn1Value::$variant(inner) => Ok(inner.clone()),
                    other => Err($crate::coerce::coercion_error(Self::TYPE_NAME, other)),
                }
            }
        }

        impl $crate::coerce::UniversalType for $ty {
            const TAG_NUMBER: u32 = $number;
        }

        impl From<$ty> for $crate::value::Asn1Value {
            fn from(value: $ty) -> Self {
                $crate::value::Asn1Value::$variant(value)
            }
        }
    };
}

pub(crate) use universal_type;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Integer, OctetString, Sequence};
    use crate::EncodingRule;

    #[test]
    fn test_get_instance_typed_passthrough() {
        let n = Integer::from_i64(7);
        let result: Integer = get_instance(Asn1Input::Typed(n.clone())).unwrap();
        assert_eq!(result, n);
    }

    #[test]
    fn test_get_instance_from_value() {
        let value = Asn1Value::from(OctetString::new(&[1, 2]));
        let octets: OctetString = get_instance(Asn1Input::Value(&value)).unwrap();
        assert_eq!(octets.octets(), &[1, 2]);

        let result: Asn1Result<Integer> = get_instance(Asn1Input::Value(&value));
        assert!(matches!(result, Err(Asn1Error::TypeCoercion(_))));
    }

    #[test]
    fn test_get_instance_from_bytes_trailing() {
        let result: Asn1Result<Integer> = get_instance(Asn1Input::Bytes(&[0x02, 0x01, 0x05, 0x00]));
        assert!(matches!(result, Err(Asn1Error::TypeCoercion(_))));
    }

    #[test]
    fn test_get_optional() {
        let value = Asn1Value::from(Integer::from_i64(1));
        assert!(get_optional::<Integer>(&value).unwrap().is_some());
        assert!(get_optional::<OctetString>(&value).unwrap().is_none());
    }

    #[test]
    fn test_get_tagged_implicit_and_explicit() {
        let implicit = crate::decode(&[0x83, 0x01, 0x05]).unwrap();
        let tagged = TaggedObject::try_from_value(&implicit).unwrap();
        let n: Integer = get_context_tagged(&tagged, false).unwrap();
        assert_eq!(n.to_i64(), Some(5));

        let explicit = TaggedObject::context_explicit(0, Sequence::new(vec![]).into());
        let seq: Sequence = get_tagged(&explicit, true).unwrap();
        assert!(seq.is_empty());
        assert_eq!(
            Asn1Value::from(explicit).to_bytes(EncodingRule::Der),
            vec![0xA0, 0x02, 0x30, 0x00]
        );
    }
}
