//! ```text
//! DirectoryString ::= CHOICE {
//!     teletexString       TeletexString,
//!     printableString     PrintableString,
//!     universalString     UniversalString,
//!     utf8String          UTF8String,
//!     bmpString           BMPString }
//! ```

use asn1_codec::choice::{Alternative, Asn1Choice, get_choice_instance, get_tagged_choice};
use asn1_codec::coerce::{Asn1Input, get_optional};
use asn1_codec::types::{
    Asn1String, BmpString, PrintableString, T61String, TaggedObject, UniversalString, Utf8String,
};
use asn1_codec::value::Asn1Value;
use asn1_core::Asn1Result;
use std::fmt;

/// Attribute value text in a distinguished name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryString {
    Teletex(T61String),
    Printable(PrintableString),
    Universal(UniversalString),
    Utf8(Utf8String),
    Bmp(BmpString),
}

impl Asn1Choice for DirectoryString {
    const TYPE_NAME: &'static str = "DirectoryString";
    const ALTERNATIVES: &'static [Alternative<Self>] = &[
        |v| Ok(get_optional::<T61String>(v)?.map(DirectoryString::Teletex)),
        |v| Ok(get_optional::<PrintableString>(v)?.map(DirectoryString::Printable)),
        |v| Ok(get_optional::<UniversalString>(v)?.map(DirectoryString::Universal)),
        |v| Ok(get_optional::<Utf8String>(v)?.map(DirectoryString::Utf8)),
        |v| Ok(get_optional::<BmpString>(v)?.map(DirectoryString::Bmp)),
    ];
}

impl DirectoryString {
    /// A UTF8String, the form RFC 5280 asks new certificates to use
    pub fn new(text: &str) -> Asn1Result<Self> {
        Utf8String::new(text).map(DirectoryString::Utf8)
    }

    pub fn get_instance(input: Asn1Input<'_, Self>) -> Asn1Result<Self> {
        get_choice_instance(input)
    }

    pub fn get_tagged(tagged: &TaggedObject, declared_explicit: bool) -> Asn1Result<Self> {
        get_tagged_choice(tagged, declared_explicit)
    }

    pub fn as_asn1_string(&self) -> &Asn1String {
        match self {
            DirectoryString::Teletex(s) => s.as_asn1_string(),
            DirectoryString::Printable(s) => s.as_asn1_string(),
            DirectoryString::Universal(s) => s.as_asn1_string(),
            DirectoryString::Utf8(s) => s.as_asn1_string(),
            DirectoryString::Bmp(s) => s.as_asn1_string(),
        }
    }

    /// Decoded text; `MalformedInput` if the octets are invalid for the kind
    pub fn get_string(&self) -> Asn1Result<String> {
        self.as_asn1_string().get_string()
    }

    pub fn to_value(&self) -> Asn1Value {
        self.as_asn1_string().clone().into()
    }
}

impl From<DirectoryString> for Asn1Value {
    fn from(value: DirectoryString) -> Self {
        value.to_value()
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_asn1_string(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn1_codec::types::Ia5String;
    use asn1_core::Asn1Error;
    use hex_literal::hex;

    #[test]
    fn test_alternatives() {
        let printable =
            DirectoryString::get_instance(Asn1Input::Bytes(&hex!("13 02 55 53"))).unwrap();
        assert!(matches!(printable, DirectoryString::Printable(_)));
        assert_eq!(printable.get_string().unwrap(), "US");

        let bmp = DirectoryString::get_instance(Asn1Input::Bytes(&hex!("1E 04 00 48 00 69"))).unwrap();
        assert!(matches!(bmp, DirectoryString::Bmp(_)));
        assert_eq!(bmp.get_string().unwrap(), "Hi");

        let universal =
            DirectoryString::get_instance(Asn1Input::Bytes(&hex!("1C 04 00 01 F6 00"))).unwrap();
        assert_eq!(universal.get_string().unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_ia5_is_not_an_alternative() {
        let value: Asn1Value = Ia5String::new("a@b").unwrap().into();
        let err = DirectoryString::get_instance(Asn1Input::Value(&value)).unwrap_err();
        assert!(matches!(err, Asn1Error::TypeCoercion(_)));
    }

    #[test]
    fn test_bad_utf8_decodes_but_fails_to_read() {
        let ds = DirectoryString::get_instance(Asn1Input::Bytes(&hex!("0C 01 FF"))).unwrap();
        assert!(ds.get_string().unwrap_err().is_malformed());
    }

    #[test]
    fn test_new_encodes_utf8() {
        let ds = DirectoryString::new("Zürich").unwrap();
        assert_eq!(ds.to_value().to_der(), hex!("0C 07 5A C3 BC 72 69 63 68").to_vec());
    }
}
