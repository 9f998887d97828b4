//! Symmetric key material for HMAC signing
//!
//! The secret is supplied base64-encoded by the configuration and kept in
//! memory only as long as the owning [`Signer`](crate::Signer) lives. Bytes are
//! wiped on drop and never printed.

use crate::error::{Error, Result};
use crate::limits::{MAX_KEY_LENGTH, MIN_KEY_LENGTH};

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric secret used by the HMAC signer
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    /// Create a key from raw bytes
    ///
    /// Keys shorter than 16 bytes are rejected.
    pub fn from_bytes(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = secret.into();
        if bytes.len() < MIN_KEY_LENGTH {
            return Err(Error::KeyLengthInvalid {
                length: bytes.len(),
                min: MIN_KEY_LENGTH,
                max: usize::MAX,
            });
        }
        Ok(Self { bytes })
    }

    /// Decode a standard (padded) base64 secret
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            Error::ConfigurationInvalid(format!("signing key is not valid base64: {e}"))
        })?;
        Self::from_bytes(bytes)
    }

    /// Generate a random secret of `length` bytes, returned base64-encoded
    ///
    /// `length` must be between 16 and 128 bytes.
    pub fn generate(length: usize) -> Result<String> {
        if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&length) {
            return Err(Error::KeyLengthInvalid {
                length,
                min: MIN_KEY_LENGTH,
                max: MAX_KEY_LENGTH,
            });
        }

        let mut bytes = vec![0u8; length];
        rand::rng().fill_bytes(&mut bytes);
        let encoded = STANDARD.encode(&bytes);
        bytes.zeroize();

        Ok(encoded)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
