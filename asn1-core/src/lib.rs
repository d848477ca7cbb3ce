//! Core types for the ASN.1 codec
//!
//! This crate provides the error type, the encoding rule variants and the
//! decoder configuration shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod rule;

pub use config::{DecoderConfig, DecoderConfigBuilder};
pub use error::{Asn1Error, Asn1Result};
pub use rule::EncodingRule;
