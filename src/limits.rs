//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload JSON (64KB)
/// Payloads carry application data, but must be bounded to prevent DoS
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// HMAC-SHA512 produces 64 bytes; the margin keeps foreign tokens parseable
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for Base64URL-encoded signature string (1.5KB)
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1536;

// ============================================================================
// Header and claim field limits
// ============================================================================

/// Maximum length for algorithm (alg) field in the header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for registered string claims (2048 bytes)
/// Applies to iss, aud, jti and uid
pub(crate) const MAX_CLAIM_STRING_LENGTH: usize = 2048;

// ============================================================================
// Timestamp bounds
// ============================================================================

/// Minimum valid Unix timestamp (1970-01-01 00:00:00 UTC)
pub(crate) const MIN_TIMESTAMP: i64 = 0;

/// Maximum valid Unix timestamp (2100-01-01 00:00:00 UTC)
pub(crate) const MAX_TIMESTAMP: i64 = 4_102_444_800;

// ============================================================================
// Validation and key bounds
// ============================================================================

/// Maximum leeway for time validation (300 seconds = 5 minutes)
/// Prevents leeway from effectively disabling expiration checks
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

/// Minimum signing key length in bytes
pub(crate) const MIN_KEY_LENGTH: usize = 16;

/// Maximum length for generated signing keys in bytes
pub(crate) const MAX_KEY_LENGTH: usize = 128;

/// Upper bound on distinct compiled constraint sets kept per service
pub(crate) const MAX_CACHED_CONSTRAINT_SETS: u64 = 32;
