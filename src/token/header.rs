use crate::algorithm::HmacAlgorithm;
use serde::{Deserialize, Serialize};

/// Header type written into every issued token
pub const BEARER: &str = "Bearer";

/// Token header structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type ("Bearer" for issued tokens)
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Key ID, carried through when present in foreign tokens
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

impl TokenHeader {
    /// Header for a freshly issued bearer token
    pub(crate) fn bearer(algorithm: HmacAlgorithm) -> Self {
        Self {
            algorithm: algorithm.as_str().into(),
            token_type: Some(BEARER.into()),
            key_id: None,
        }
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }
}
