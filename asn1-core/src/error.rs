use thiserror::Error;

/// Main error type for ASN.1 codec operations
///
/// The variants follow the failure classes a caller has to tell apart:
/// bad wire data (`MalformedInput`, `TagMismatch`, `LimitExceeded`) versus
/// wrong use of the codec by the calling code (`SchemaContract`).
#[derive(Error, Debug)]
pub enum Asn1Error {
    /// Truncated buffer, invalid length, bad pad bits, trailing bytes...
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Decoded tag does not match the tag the call site expects
    #[error("Expected {expected} tag but found {found}")]
    TagMismatch { expected: String, found: String },

    /// The calling code used a type against its schema rules
    /// (e.g. implicit tagging of a CHOICE). Not a decode failure.
    #[error("Schema contract violation: {0}")]
    SchemaContract(String),

    #[error("Type coercion failed: {0}")]
    TypeCoercion(String),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    /// A caller-supplied construction argument is out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configured decode limit was exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Asn1Error {
    /// Build a tag mismatch error from two already rendered tag texts
    pub fn tag_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Asn1Error::TagMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Does this error describe bad wire data?
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Asn1Error::MalformedInput(_) | Asn1Error::TagMismatch { .. } | Asn1Error::LimitExceeded(_)
        )
    }

    /// Does this error describe a bug in the calling code?
    pub fn is_schema_contract(&self) -> bool {
        matches!(self, Asn1Error::SchemaContract(_))
    }
}

/// Result type alias for ASN.1 codec operations
pub type Asn1Result<T> = Result<T, Asn1Error>;
