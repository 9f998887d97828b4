//! Errors for jwt-bearer
//!
//! Parsing problems, encoding failures, configuration mistakes and constraint
//! violations all surface through the single [`Error`] enum. Constraint
//! violations are special: depending on `throw_on_failure` they are either
//! raised as [`Error::ConstraintsViolated`] or handed back as a regular value
//! (see [`crate::Decoded`]).

use crate::constraints::Violations;
use thiserror::Error;

/// jwt-bearer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid token format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Signature Base64URL string too large: {size} bytes (maximum: {max} bytes)")]
    SignatureB64TooLarge { size: usize, max: usize },

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    // ============================================================================
    // Claim Structure Errors
    // ============================================================================
    #[error("Missing required field: {0}")]
    ClaimMissingField(String),

    #[error("Claim '{claim}' has an invalid type: expected {expected}")]
    ClaimInvalidType { claim: String, expected: String },

    #[error("Claim '{claim}' too long: {length} bytes (maximum: {max} bytes)")]
    ClaimStringTooLong {
        claim: String,
        length: usize,
        max: usize,
    },

    #[error("Timestamp out of bounds: {value} (valid range: {min} to {max})")]
    TimestampOutOfBounds { value: i64, min: i64, max: i64 },

    // ============================================================================
    // Encoding Errors
    // ============================================================================
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error(transparent)]
    ConstraintsViolated(#[from] Violations),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    #[error("The 'none' algorithm is rejected for security reasons (RFC 8725)")]
    AlgorithmNoneRejected,

    #[error("Invalid time offset expression: {0}")]
    OffsetInvalid(String),

    #[error("Clock skew too large: {value} seconds (maximum: {max} seconds)")]
    ClockSkewTooLarge { value: u64, max: u64 },

    #[error("Invalid key length: {length} bytes (allowed: {min} to {max} bytes)")]
    KeyLengthInvalid {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

impl Error {
    /// Whether the error means the presented token could not be parsed
    ///
    /// These are the errors the inspection operations swallow into
    /// `false`/`None`/"expired".
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::TokenTooLarge { .. }
                | Error::FormatInvalid
                | Error::FormatInvalidBase64(_)
                | Error::FormatInvalidJson(_)
                | Error::SignatureB64TooLarge { .. }
                | Error::HeaderFieldTooLong { .. }
                | Error::ClaimMissingField(_)
                | Error::ClaimInvalidType { .. }
                | Error::ClaimStringTooLong { .. }
                | Error::TimestampOutOfBounds { .. }
        )
    }

    /// The violations carried by a raised constraint failure
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::ConstraintsViolated(violations) => Some(violations),
            _ => None,
        }
    }
}

/// Result type alias for jwt-bearer operations
pub type Result<T> = std::result::Result<T, Error>;
