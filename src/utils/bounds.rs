//! Bounds validation utilities
//!
//! Timestamp bounds, field size limits and overflow-safe time arithmetic.

use crate::error::{Error, Result};
use crate::limits::{MAX_TIMESTAMP, MIN_TIMESTAMP};

/// Check if timestamp is within acceptable bounds
pub(crate) fn validate_timestamp_bounds(value: i64) -> Result<()> {
    if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&value) {
        return Err(Error::TimestampOutOfBounds {
            value,
            min: MIN_TIMESTAMP,
            max: MAX_TIMESTAMP,
        });
    }
    Ok(())
}

/// Apply leeway to a timestamp, saturating instead of overflowing
pub(crate) fn apply_leeway(timestamp: i64, leeway_seconds: u64) -> i64 {
    timestamp.saturating_add(i64::try_from(leeway_seconds).unwrap_or(i64::MAX))
}

/// Validate header field size
pub(crate) fn validate_field_size(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::HeaderFieldTooLong {
            field: field.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}

/// Validate a registered string claim's length
pub(crate) fn validate_claim_string(claim: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::ClaimStringTooLong {
            claim: claim.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}
