//! Decoder configuration
//!
//! The codec itself never blocks and is bounded only by its input, so the
//! limits here are the single place a caller bounds the work a decode call
//! may do on untrusted input.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1_core::{DecoderConfig, EncodingRule};
//!
//! let config = DecoderConfig::builder()
//!     .rule(EncodingRule::Der)
//!     .max_depth(16)
//!     .build()?;
//! # Ok::<(), asn1_core::Asn1Error>(())
//! ```

use crate::error::{Asn1Error, Asn1Result};
use crate::rule::EncodingRule;
use serde::{Deserialize, Serialize};

/// Default maximum nesting depth of constructed values
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum content length of a single TLV unit (16 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Settings applied to one decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Rule the input must conform to
    pub rule: EncodingRule,
    /// Maximum nesting depth of constructed values
    pub max_depth: usize,
    /// Maximum declared content length of any TLV unit
    pub max_content_length: usize,
}

impl DecoderConfig {
    /// Default configuration for the given rule
    pub fn for_rule(rule: EncodingRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    /// Start building a configuration
    pub fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder::new()
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            rule: EncodingRule::Ber,
            max_depth: DEFAULT_MAX_DEPTH,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

/// Builder for [`DecoderConfig`]
///
/// # Default Settings
/// - Rule: BER
/// - Max depth: 64
/// - Max content length: 16 MiB
#[derive(Debug, Clone)]
pub struct DecoderConfigBuilder {
    rule: EncodingRule,
    max_depth: usize,
    max_content_length: usize,
}

impl DecoderConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            rule: EncodingRule::Ber,
            max_depth: DEFAULT_MAX_DEPTH,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }

    /// Set the encoding rule the input must follow
    pub fn rule(mut self, rule: EncodingRule) -> Self {
        self.rule = rule;
        self
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum content length of a single TLV unit
    pub fn max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// Returns `InvalidArgument` if a limit is zero.
    pub fn build(self) -> Asn1Result<DecoderConfig> {
        if self.max_depth == 0 {
            return Err(Asn1Error::InvalidArgument(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_content_length == 0 {
            return Err(Asn1Error::InvalidArgument(
                "max_content_length must be at least 1".to_string(),
            ));
        }

        Ok(DecoderConfig {
            rule: self.rule,
            max_depth: self.max_depth,
            max_content_length: self.max_content_length,
        })
    }
}

impl Default for DecoderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DecoderConfig::builder().build().unwrap();
        assert_eq!(config, DecoderConfig::default());
        assert_eq!(config.rule, EncodingRule::Ber);
    }

    #[test]
    fn test_builder_rejects_zero_depth() {
        let result = DecoderConfig::builder().max_depth(0).build();
        assert!(matches!(result, Err(Asn1Error::InvalidArgument(_))));
    }

    #[test]
    fn test_for_rule() {
        let config = DecoderConfig::for_rule(EncodingRule::Dl);
        assert_eq!(config.rule, EncodingRule::Dl);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
