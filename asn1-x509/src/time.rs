//! `Time ::= CHOICE { utcTime UTCTime, generalTime GeneralizedTime }`

use asn1_codec::choice::{Alternative, Asn1Choice, get_choice_instance, get_tagged_choice};
use asn1_codec::coerce::{Asn1Input, get_optional};
use asn1_codec::types::{GeneralizedTime, TaggedObject, UtcTime};
use asn1_codec::value::Asn1Value;
use asn1_core::{Asn1Error, Asn1Result};
use std::fmt;

/// Certificate validity time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Time {
    Utc(UtcTime),
    Generalized(GeneralizedTime),
}

impl Asn1Choice for Time {
    const TYPE_NAME: &'static str = "Time";
    const ALTERNATIVES: &'static [Alternative<Self>] = &[
        |v| Ok(get_optional::<UtcTime>(v)?.map(Time::Utc)),
        |v| Ok(get_optional::<GeneralizedTime>(v)?.map(Time::Generalized)),
    ];
}

impl Time {
    pub fn get_instance(input: Asn1Input<'_, Self>) -> Asn1Result<Self> {
        get_choice_instance(input)
    }

    /// Always explicit; `declared_explicit == false` is a schema error
    pub fn get_tagged(tagged: &TaggedObject, declared_explicit: bool) -> Asn1Result<Self> {
        get_tagged_choice(tagged, declared_explicit)
    }

    /// The time text exactly as encoded
    pub fn time_string(&self) -> Asn1Result<String> {
        match self {
            Time::Utc(t) => t.get_string(),
            Time::Generalized(t) => t.get_string(),
        }
    }

    /// The time as GeneralizedTime text
    ///
    /// A two-digit UTCTime year below 50 is read as 20YY, otherwise 19YY
    /// (RFC 5280, 4.1.2.5.1).
    pub fn generalized_string(&self) -> Asn1Result<String> {
        let text = self.time_string()?;
        match self {
            Time::Generalized(_) => Ok(text),
            Time::Utc(_) => {
                let year: u32 = text
                    .get(..2)
                    .and_then(|yy| yy.parse().ok())
                    .ok_or_else(|| {
                        Asn1Error::MalformedInput(format!("invalid UTCTime '{}'", text))
                    })?;
                let century = if year < 50 { "20" } else { "19" };
                Ok(format!("{}{}", century, text))
            }
        }
    }

    pub fn to_value(&self) -> Asn1Value {
        match self {
            Time::Utc(t) => t.clone().into(),
            Time::Generalized(t) => t.clone().into(),
        }
    }
}

impl From<Time> for Asn1Value {
    fn from(value: Time) -> Self {
        value.to_value()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Time::Utc(t) => fmt::Display::fmt(t, f),
            Time::Generalized(t) => fmt::Display::fmt(t, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_utc_time() {
        let time = Time::get_instance(Asn1Input::Bytes(&hex!(
            "17 0D 34 39 31 32 33 31 32 33 35 39 35 39 5A"
        )))
        .unwrap();
        assert!(matches!(time, Time::Utc(_)));
        assert_eq!(time.time_string().unwrap(), "491231235959Z");
        assert_eq!(time.generalized_string().unwrap(), "20491231235959Z");
    }

    #[test]
    fn test_utc_time_last_century() {
        let time = Time::Utc(UtcTime::new("950101000000Z").unwrap());
        assert_eq!(time.generalized_string().unwrap(), "19950101000000Z");
    }

    #[test]
    fn test_generalized_time() {
        let bytes = hex!("18 0F 32 30 35 30 30 31 30 31 31 32 30 30 30 30 5A");
        let time = Time::get_instance(Asn1Input::Bytes(&bytes)).unwrap();
        assert_eq!(time.generalized_string().unwrap(), "20500101120000Z");
        assert_eq!(time.to_value().to_der(), bytes.to_vec());
    }

    #[test]
    fn test_other_type_rejected() {
        let err = Time::get_instance(Asn1Input::Bytes(&hex!("02 01 01"))).unwrap_err();
        assert!(matches!(err, Asn1Error::TypeCoercion(_)));
    }

    #[test]
    fn test_tagged_time_is_explicit() {
        let value = asn1_codec::decode(&hex!("A0 0F 17 0D 34 39 31 32 33 31 32 33 35 39 35 39 5A")).unwrap();
        let tagged = value.as_tagged().unwrap();
        assert!(Time::get_tagged(tagged, true).is_ok());
        assert!(Time::get_tagged(tagged, false).unwrap_err().is_schema_contract());
    }
}
