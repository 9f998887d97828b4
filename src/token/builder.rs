use crate::algorithm::Signer;
use crate::claims::{AUDIENCE, Claims, EXPIRATION, ISSUED_AT, ISSUER, JWT_ID, NOT_BEFORE};
use crate::error::{Error, Result};
use crate::token::TokenHeader;
use crate::utils::base64url;

use serde_json::Value;

/// Assembles and signs a compact token
///
/// Application claims go in first; registered claims are written afterwards
/// so they always win over a colliding application key.
pub(crate) struct TokenBuilder {
    header: TokenHeader,
    claims: Claims,
}

impl TokenBuilder {
    pub(crate) fn new(header: TokenHeader) -> Self {
        Self {
            header,
            claims: Claims::default(),
        }
    }

    pub(crate) fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name, value);
        self
    }

    /// Configures the issuer (iss claim)
    pub(crate) fn issued_by(self, issuer: &str) -> Self {
        self.with_claim(ISSUER, issuer)
    }

    /// Configures the audience (aud claim)
    pub(crate) fn permitted_for(self, audience: &str) -> Self {
        self.with_claim(AUDIENCE, audience)
    }

    /// Configures the id (jti claim)
    pub(crate) fn identified_by(self, identifier: &str) -> Self {
        self.with_claim(JWT_ID, identifier)
    }

    /// Configures the time the token was issued (iat claim)
    pub(crate) fn issued_at(self, timestamp: i64) -> Self {
        self.with_claim(ISSUED_AT, timestamp)
    }

    /// Configures the time the token can be used from (nbf claim)
    pub(crate) fn can_only_be_used_after(self, timestamp: i64) -> Self {
        self.with_claim(NOT_BEFORE, timestamp)
    }

    /// Configures the expiration time (exp claim)
    pub(crate) fn expires_at(self, timestamp: i64) -> Self {
        self.with_claim(EXPIRATION, timestamp)
    }

    /// Serialize, sign and join the three segments
    pub(crate) fn sign(self, signer: &Signer) -> Result<String> {
        let header_json = serde_json::to_vec(&self.header)
            .map_err(|e| Error::Encoding(format!("Failed to serialize header: {e}")))?;
        let payload_json = serde_json::to_vec(&self.claims)
            .map_err(|e| Error::Encoding(format!("Failed to serialize claims: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            base64url::encode_bytes(&header_json),
            base64url::encode_bytes(&payload_json)
        );
        let signature = signer.sign(signing_input.as_bytes())?;

        Ok(format!("{signing_input}.{}", base64url::encode_bytes(&signature)))
    }
}
