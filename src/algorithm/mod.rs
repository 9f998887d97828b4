//! HMAC algorithm selection and the token signer
pub(crate) mod hmac;

use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::limits::MAX_ALG_LENGTH;

/// Symmetric signing algorithm, as named in the token header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmacAlgorithm {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,
}

impl HmacAlgorithm {
    /// Parse an algorithm name
    ///
    /// Accepts the header names (`HS256`) and the digest names (`SHA256`),
    /// case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmUnsupported(format!(
                "Algorithm string too long: {} bytes (maximum: {} bytes)",
                s.len(),
                MAX_ALG_LENGTH
            )));
        }

        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Err(Error::AlgorithmNoneRejected),
            "HS256" | "SHA256" => Ok(HmacAlgorithm::HS256),
            "HS384" | "SHA384" => Ok(HmacAlgorithm::HS384),
            "HS512" | "SHA512" => Ok(HmacAlgorithm::HS512),
            _ => Err(Error::AlgorithmUnsupported(s.into())),
        }
    }

    /// Header representation (`alg` value)
    pub const fn as_str(&self) -> &'static str {
        match self {
            HmacAlgorithm::HS256 => "HS256",
            HmacAlgorithm::HS384 => "HS384",
            HmacAlgorithm::HS512 => "HS512",
        }
    }
}

impl std::fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for HmacAlgorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Signs and verifies the `header.payload` portion of a token
///
/// Wraps one HMAC variant together with the configured secret.
#[derive(Debug, Clone)]
pub struct Signer {
    algorithm: HmacAlgorithm,
    key: SigningKey,
}

impl Signer {
    /// Create a signer for the given algorithm and key
    pub fn new(algorithm: HmacAlgorithm, key: SigningKey) -> Self {
        Self { algorithm, key }
    }

    /// The algorithm this signer produces
    pub fn algorithm(&self) -> HmacAlgorithm {
        self.algorithm
    }

    /// Sign `signing_input`, returning raw signature bytes
    pub fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>> {
        hmac::sign(self.algorithm, signing_input, self.key.as_bytes())
    }

    /// Check `signature` against `signing_input`
    pub fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        hmac::verify(self.algorithm, signing_input, signature, self.key.as_bytes())
    }
}
