//! Value types
//!
//! One module per universal type family, plus tagged objects.

pub mod bit_string;
pub mod boolean;
pub mod integer;
pub mod null;
pub mod octet_string;
pub mod oid;
pub mod sequence;
pub mod string;
pub mod tagged;

pub use bit_string::BitString;
pub use boolean::Boolean;
pub use integer::{Enumerated, Integer};
pub use null::Null;
pub use octet_string::OctetString;
pub use oid::ObjectIdentifier;
pub use sequence::{Sequence, Set};
pub use string::{
    Asn1String, BmpString, GeneralString, GeneralizedTime, GraphicString, Ia5String,
    NumericString, PrintableString, StringKind, T61String, UniversalString, UtcTime, Utf8String,
    VisibleString,
};
pub use tagged::TaggedObject;
