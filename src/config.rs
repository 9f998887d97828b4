//! Service configuration
//!
//! [`JwtConfig`] is what hosts supply (deserialized from their own config files
//! or built in code). It is resolved exactly once, in
//! [`JwtService::new`](crate::JwtService::new), into the crate-internal
//! [`Settings`] where every value is decoded, parsed and checked.

use crate::algorithm::{HmacAlgorithm, Signer};
use crate::constraints::ConstraintName;
use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::limits::MAX_CLOCK_SKEW_SECONDS;

use serde::{Deserialize, Serialize};

/// Default base64 signing secret (replace in production)
pub const DEFAULT_SIGNING_KEY: &str = "mBC5v1sOKVvbdEitdSBenu59nfNfhwkedkJVNabosTw=";

/// Token configuration
///
/// ```ignore
/// let config = JwtConfig::default()
///     .signing_key(SigningKey::generate(32)?)
///     .issuer("https://auth.example.com")
///     .audience("https://api.example.com")
///     .expires_at("+1 hour")
///     .uid("user-42");
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub signing_key: String,

    /// Issuer written to and expected in `iss`
    pub issuer: String,

    /// Audience written to and expected in `aud`
    pub audience: String,

    /// Token identifier written to and expected in `jti`
    pub identifier: String,

    /// Offset from issuance for `nbf`, e.g. `+0 minute`
    pub not_before: String,

    /// Offset from issuance for `exp`, e.g. `+24 hour`
    pub expires_at: String,

    /// `HS256`, `HS384` or `HS512`
    pub algorithm: String,

    /// Default subject written to `uid` when `encode` gets none
    pub uid: Option<String>,

    /// Raise constraint violations instead of returning them
    pub throw_on_failure: bool,

    /// Run the constraint engine on `decode`
    pub validate: bool,

    /// Ordered constraint names to evaluate
    pub constraints: Vec<String>,

    /// Seconds of clock skew tolerated by `ValidAt`
    pub leeway: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            signing_key: DEFAULT_SIGNING_KEY.into(),
            issuer: "http://example.local".into(),
            audience: "http://example.local".into(),
            identifier: "4f1g23a12aa".into(),
            not_before: "+0 minute".into(),
            expires_at: "+24 hour".into(),
            algorithm: HmacAlgorithm::HS256.as_str().into(),
            uid: None,
            throw_on_failure: true,
            validate: true,
            constraints: ConstraintName::ALL
                .iter()
                .map(|name| name.as_str().to_string())
                .collect(),
            leeway: 0,
        }
    }
}

impl JwtConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base64-encoded signing secret
    pub fn signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = key.into();
        self
    }

    /// Set the issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the audience
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Set the token identifier
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the not-before offset expression
    pub fn not_before(mut self, offset: impl Into<String>) -> Self {
        self.not_before = offset.into();
        self
    }

    /// Set the expiry offset expression
    pub fn expires_at(mut self, offset: impl Into<String>) -> Self {
        self.expires_at = offset.into();
        self
    }

    /// Set the signing algorithm
    pub fn algorithm(mut self, algorithm: HmacAlgorithm) -> Self {
        self.algorithm = algorithm.as_str().into();
        self
    }

    /// Set the default subject
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Choose between raised and returned constraint violations
    pub fn throw_on_failure(mut self, throw: bool) -> Self {
        self.throw_on_failure = throw;
        self
    }

    /// Enable or disable validation on `decode`
    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Replace the ordered constraint list
    pub fn constraints<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the clock skew tolerance for `ValidAt`
    ///
    /// # Security
    /// Leeway is capped at 300 seconds; larger values are rejected when the
    /// service is built.
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("identifier", &self.identifier)
            .field("not_before", &self.not_before)
            .field("expires_at", &self.expires_at)
            .field("algorithm", &self.algorithm)
            .field("uid", &self.uid)
            .field("throw_on_failure", &self.throw_on_failure)
            .field("validate", &self.validate)
            .field("constraints", &self.constraints)
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// Fully resolved configuration used at runtime
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) signer: Signer,
    pub(crate) issuer: String,
    pub(crate) audience: String,
    pub(crate) identifier: String,
    pub(crate) not_before: TimeOffset,
    pub(crate) expires_at: TimeOffset,
    pub(crate) uid: Option<String>,
    pub(crate) throw_on_failure: bool,
    pub(crate) validate: bool,
    pub(crate) constraint_names: Vec<String>,
    pub(crate) leeway: u64,
}

impl Settings {
    pub(crate) fn resolve(config: &JwtConfig) -> Result<Self> {
        if config.leeway > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ClockSkewTooLarge {
                value: config.leeway,
                max: MAX_CLOCK_SKEW_SECONDS,
            });
        }

        let algorithm = HmacAlgorithm::from_str(&config.algorithm)?;
        let key = SigningKey::from_base64(&config.signing_key)?;

        Ok(Self {
            signer: Signer::new(algorithm, key),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            identifier: config.identifier.clone(),
            not_before: TimeOffset::parse(&config.not_before)?,
            expires_at: TimeOffset::parse(&config.expires_at)?,
            uid: config.uid.clone().filter(|uid| !uid.is_empty()),
            throw_on_failure: config.throw_on_failure,
            validate: config.validate,
            constraint_names: config.constraints.clone(),
            leeway: config.leeway,
        })
    }
}

/// A signed duration relative to issuance, parsed from expressions like `+24 hour`
///
/// Grammar: one or more `[+|-]N unit` terms. Units: `sec`, `second`, `min`,
/// `minute`, `hour`, `day`, `week`, each optionally plural, case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOffset {
    seconds: i64,
}

impl TimeOffset {
    /// Offset of exactly `seconds`
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Parse an offset expression
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = |why: &str| Error::OffsetInvalid(format!("'{expr}': {why}"));

        let mut chars = expr.chars().peekable();
        let mut total: i64 = 0;
        let mut terms = 0;

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let sign = match chars.next_if(|c| *c == '+' || *c == '-') {
                Some('-') => -1,
                _ => 1,
            };
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut digits = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_digit) {
                digits.push(c);
            }
            if digits.is_empty() {
                return Err(invalid("expected a number"));
            }
            let amount: i64 = digits.parse().map_err(|_| invalid("number out of range"))?;

            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            let mut unit = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_alphabetic) {
                unit.push(c.to_ascii_lowercase());
            }
            let scale = unit_seconds(&unit).ok_or_else(|| invalid("unknown unit"))?;

            total = amount
                .checked_mul(scale)
                .and_then(|term| term.checked_mul(sign))
                .and_then(|term| total.checked_add(term))
                .ok_or_else(|| invalid("offset out of range"))?;
            terms += 1;
        }

        if terms == 0 {
            return Err(invalid("empty expression"));
        }

        Ok(Self { seconds: total })
    }

    /// Offset in seconds
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Apply the offset to a Unix timestamp
    pub fn apply(&self, timestamp: i64) -> i64 {
        timestamp.saturating_add(self.seconds)
    }
}

impl std::str::FromStr for TimeOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn unit_seconds(unit: &str) -> Option<i64> {
    let singular = unit.strip_suffix('s').filter(|u| !u.is_empty()).unwrap_or(unit);
    match singular {
        "sec" | "second" => Some(1),
        "min" | "minute" => Some(60),
        "hour" => Some(3_600),
        "day" => Some(86_400),
        "week" => Some(604_800),
        _ => None,
    }
}
