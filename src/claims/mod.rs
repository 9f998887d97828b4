//! Claim sets carried inside tokens
//!
//! A [`Claims`] value is an ordered-by-name map from claim name to arbitrary
//! JSON. The registered claims (`iss`, `aud`, `jti`, `iat`, `nbf`, `exp`) are
//! always written by the codec; `uid` is written when a subject resolves.
//! Everything else belongs to the application.

use crate::error::{Error, Result};
use crate::limits::MAX_CLAIM_STRING_LENGTH;
use crate::utils::bounds::{validate_claim_string, validate_timestamp_bounds};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issuer (iss) - identifies the principal that issued the token
pub const ISSUER: &str = "iss";
/// Audience (aud) - identifies the recipients the token is intended for
pub const AUDIENCE: &str = "aud";
/// Token ID (jti) - identifier configured for the token
pub const JWT_ID: &str = "jti";
/// Issued At (iat) - Unix timestamp of issuance
pub const ISSUED_AT: &str = "iat";
/// Not Before (nbf) - Unix timestamp before which the token must not be accepted
pub const NOT_BEFORE: &str = "nbf";
/// Expiration Time (exp) - Unix timestamp at which the token stops being valid
pub const EXPIRATION: &str = "exp";
/// Subject/user identifier
pub const UID: &str = "uid";

/// Claims the codec always sets and callers can never override
pub const REGISTERED: [&str; 6] = [ISSUER, AUDIENCE, JWT_ID, ISSUED_AT, NOT_BEFORE, EXPIRATION];

/// A token's claim set
///
/// Returned by [`JwtService::decode`](crate::JwtService::decode) once all
/// constraints pass, and by
/// [`JwtService::extract_claims_unsafe`](crate::JwtService::extract_claims_unsafe)
/// without any checks at all.
///
/// ```ignore
/// let claims = service.decode(&token)?.into_claims().unwrap();
/// assert_eq!(claims.get_str("data"), Some("hello"));
/// assert_eq!(claims.uid(), Some("myUid"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    map: Map<String, Value>,
}

impl Claims {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self { map }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(name.into(), value.into());
    }

    /// Get a claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// Get a string claim by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(Value::as_str)
    }

    /// Whether the claim is present
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Deserialize a structured payload that was stored as a JSON string
    ///
    /// Non-split structured payloads are embedded as their JSON text under the
    /// payload claim; this reverses that.
    pub fn embedded<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let raw = self
            .map
            .get(name)
            .ok_or_else(|| Error::ClaimMissingField(name.into()))?;
        let text = raw.as_str().ok_or_else(|| Error::ClaimInvalidType {
            claim: name.into(),
            expected: "JSON string".into(),
        })?;
        serde_json::from_str(text)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse claim '{name}': {e}")))
    }

    /// Iterate over all claims
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.map.iter()
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no claims
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Borrow the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    /// Take the underlying JSON map
    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }

    /// Get the issuer (iss claim)
    pub fn issuer(&self) -> Option<&str> {
        self.get_str(ISSUER)
    }

    /// Get the audiences (aud claim), whether encoded as a string or an array
    pub fn audience(&self) -> Vec<&str> {
        match self.map.get(AUDIENCE) {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Get the token ID (jti claim)
    pub fn jwt_id(&self) -> Option<&str> {
        self.get_str(JWT_ID)
    }

    /// Get the subject/user identifier (uid claim)
    pub fn uid(&self) -> Option<&str> {
        self.get_str(UID)
    }

    /// Get the issued-at time (iat claim) as Unix timestamp
    pub fn issued_at(&self) -> Option<i64> {
        self.map.get(ISSUED_AT).and_then(timestamp)
    }

    /// Get the not-before time (nbf claim) as Unix timestamp
    pub fn not_before(&self) -> Option<i64> {
        self.map.get(NOT_BEFORE).and_then(timestamp)
    }

    /// Get the expiration time (exp claim) as Unix timestamp
    pub fn expiration(&self) -> Option<i64> {
        self.map.get(EXPIRATION).and_then(timestamp)
    }

    /// Check the shape of registered claims
    ///
    /// Runs at parse time: a token whose registered claims have the wrong JSON
    /// type, oversize strings or out-of-range timestamps is malformed.
    pub(crate) fn validate_structure(&self) -> Result<()> {
        for name in [ISSUER, JWT_ID] {
            match self.map.get(name) {
                None => {}
                Some(Value::String(value)) => {
                    validate_claim_string(name, value, MAX_CLAIM_STRING_LENGTH)?
                }
                Some(_) => return Err(invalid_type(name, "string")),
            }
        }

        // uid can come from an application payload: any JSON type, strings are bounded
        if let Some(Value::String(uid)) = self.map.get(UID) {
            validate_claim_string(UID, uid, MAX_CLAIM_STRING_LENGTH)?;
        }

        match self.map.get(AUDIENCE) {
            None => {}
            Some(Value::String(aud)) => {
                validate_claim_string(AUDIENCE, aud, MAX_CLAIM_STRING_LENGTH)?
            }
            Some(Value::Array(values)) => {
                for value in values {
                    let aud = value
                        .as_str()
                        .ok_or_else(|| invalid_type(AUDIENCE, "string or array of strings"))?;
                    validate_claim_string(AUDIENCE, aud, MAX_CLAIM_STRING_LENGTH)?;
                }
            }
            Some(_) => return Err(invalid_type(AUDIENCE, "string or array of strings")),
        }

        for name in [ISSUED_AT, NOT_BEFORE, EXPIRATION] {
            if let Some(value) = self.map.get(name) {
                let ts = timestamp(value).ok_or_else(|| invalid_type(name, "number"))?;
                validate_timestamp_bounds(ts)?;
            }
        }

        Ok(())
    }
}

/// Read a numeric date, flooring fractional seconds
fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
}

fn invalid_type(claim: &str, expected: &str) -> Error {
    Error::ClaimInvalidType {
        claim: claim.into(),
        expected: expected.into(),
    }
}
