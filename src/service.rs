//! Token service
//!
//! [`JwtService`] issues tokens and checks tokens it (or a peer with the same
//! configuration) issued. It is `Send + Sync`; share it behind an `Arc`.
//!
//! ```ignore
//! use jwt_bearer::{Decoded, JwtConfig, JwtService};
//!
//! let service = JwtService::new(&JwtConfig::default().uid("user-42"))?;
//! let token = service.encode("hello", None)?;
//!
//! match service.decode(&token)? {
//!     Decoded::Claims(claims) => assert_eq!(claims.get_str("data"), Some("hello")),
//!     Decoded::Violated(violations) => eprintln!("{violations}"),
//! }
//! ```

use crate::claims::{Claims, EXPIRATION, ISSUED_AT, NOT_BEFORE, REGISTERED, UID};
use crate::clock::{Clock, SystemClock};
use crate::config::{JwtConfig, Settings};
use crate::constraints::Violations;
use crate::constraints::cache::ConstraintCache;
use crate::error::{Error, Result};
use crate::token::{ParsedToken, TokenBuilder, TokenHeader};
use crate::utils::bounds::validate_timestamp_bounds;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Claim name payloads are stored under unless changed
pub const DEFAULT_PARAM_DATA: &str = "data";

/// Outcome of [`JwtService::decode`]
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Every configured constraint passed (or validation is disabled)
    Claims(Claims),
    /// At least one constraint failed and failures are not raised
    Violated(Violations),
}

impl Decoded {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Decoded::Claims(claims) => Some(claims),
            Decoded::Violated(_) => None,
        }
    }

    pub fn into_claims(self) -> Option<Claims> {
        match self {
            Decoded::Claims(claims) => Some(claims),
            Decoded::Violated(_) => None,
        }
    }

    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Decoded::Claims(_) => None,
            Decoded::Violated(violations) => Some(violations),
        }
    }

    pub fn is_violated(&self) -> bool {
        matches!(self, Decoded::Violated(_))
    }
}

/// Issues and validates bearer tokens
pub struct JwtService {
    settings: Settings,
    clock: Arc<dyn Clock>,
    cache: ConstraintCache,
    param_data: String,
    split_data: bool,
}

impl JwtService {
    /// Build a service from configuration
    ///
    /// All configuration errors (bad key, unknown algorithm, unparseable
    /// offsets, excessive leeway) surface here rather than on first use.
    pub fn new(config: &JwtConfig) -> Result<Self> {
        let settings = Settings::resolve(config)?;
        tracing::debug!(
            alg = %settings.signer.algorithm(),
            issuer = %settings.issuer,
            constraints = settings.constraint_names.len(),
            "token service configured"
        );

        Ok(Self {
            settings,
            clock: Arc::new(SystemClock),
            cache: ConstraintCache::new(),
            param_data: DEFAULT_PARAM_DATA.into(),
            split_data: false,
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the claim name payloads are stored under
    pub fn set_param_data(&mut self, name: impl Into<String>) -> &mut Self {
        self.param_data = name.into();
        self
    }

    /// Toggle flattening of structured payloads into top-level claims
    pub fn set_split_data(&mut self, enabled: bool) -> &mut Self {
        self.split_data = enabled;
        self
    }

    /// Apply a new configuration, dropping cached constraint sets
    ///
    /// On error the current configuration stays in place.
    pub fn reconfigure(&mut self, config: &JwtConfig) -> Result<()> {
        self.settings = Settings::resolve(config)?;
        self.cache.clear();
        Ok(())
    }

    /// Issue a signed token carrying `data`
    ///
    /// `uid` overrides the configured default subject; an explicit empty `uid`
    /// writes no subject at all. Fails with [`Error::Encoding`] when the
    /// payload cannot be serialized or the configured offsets push a time
    /// claim outside the accepted range.
    pub fn encode<T: Serialize + ?Sized>(&self, data: &T, uid: Option<&str>) -> Result<String> {
        let payload = serde_json::to_value(data)
            .map_err(|e| Error::Encoding(format!("Failed to serialize payload: {e}")))?;
        let now = self.clock.now();
        let not_before = self.settings.not_before.apply(now).min(now);
        let expires_at = self.settings.expires_at.apply(now);

        // a token with out-of-range times would never parse again
        for (claim, timestamp) in [
            (ISSUED_AT, now),
            (NOT_BEFORE, not_before),
            (EXPIRATION, expires_at),
        ] {
            validate_timestamp_bounds(timestamp)
                .map_err(|e| Error::Encoding(format!("Invalid '{claim}' claim: {e}")))?;
        }

        let mut builder = TokenBuilder::new(TokenHeader::bearer(self.settings.signer.algorithm()));
        builder = self.embed_payload(builder, payload);

        let uid = uid
            .or(self.settings.uid.as_deref())
            .filter(|uid| !uid.is_empty());
        if let Some(uid) = uid {
            builder = builder.with_claim(UID, uid);
        }

        let token = builder
            .issued_by(&self.settings.issuer)
            .permitted_for(&self.settings.audience)
            .identified_by(&self.settings.identifier)
            .issued_at(now)
            .can_only_be_used_after(not_before)
            .expires_at(expires_at)
            .sign(&self.settings.signer)?;

        tracing::trace!(iat = now, split = self.split_data, "issued token");
        Ok(token)
    }

    fn embed_payload(&self, builder: TokenBuilder, payload: Value) -> TokenBuilder {
        match payload {
            Value::Object(map) if self.split_data => map
                .into_iter()
                .fold(builder, |builder, (name, value)| self.split_claim(builder, name, value)),
            Value::Array(items) if self.split_data => items
                .into_iter()
                .enumerate()
                .fold(builder, |builder, (index, value)| {
                    self.split_claim(builder, index.to_string(), value)
                }),
            structured @ (Value::Object(_) | Value::Array(_)) => {
                builder.with_claim(self.param_data.as_str(), structured.to_string())
            }
            scalar => builder.with_claim(self.param_data.as_str(), scalar),
        }
    }

    fn split_claim(&self, builder: TokenBuilder, name: String, value: Value) -> TokenBuilder {
        if REGISTERED.contains(&name.as_str()) {
            tracing::warn!(claim = %name, "payload key collides with a registered claim and is overridden");
        }
        builder.with_claim(name, value)
    }

    /// Parse and validate a token
    ///
    /// Malformed tokens are always an error. Constraint failures are raised as
    /// [`Error::ConstraintsViolated`] when `throw_on_failure` is set and
    /// returned as [`Decoded::Violated`] otherwise. With `validate` off the
    /// claims are returned unchecked.
    pub fn decode(&self, token: &str) -> Result<Decoded> {
        let parsed = ParsedToken::from_string(token).inspect_err(|e| {
            tracing::debug!(error = %e, "rejected malformed token");
        })?;

        if !self.settings.validate {
            return Ok(Decoded::Claims(parsed.into_claims()));
        }

        match self.check(&parsed) {
            Ok(()) => Ok(Decoded::Claims(parsed.into_claims())),
            Err(violations) if self.settings.throw_on_failure => Err(violations.into()),
            Err(violations) => Ok(Decoded::Violated(violations)),
        }
    }

    /// Whether the token parses and passes every configured constraint
    ///
    /// Constraints are evaluated even when `validate` is off.
    pub fn is_valid(&self, token: &str) -> bool {
        ParsedToken::from_string(token)
            .map(|parsed| self.check(&parsed).is_ok())
            .unwrap_or(false)
    }

    /// Parse a token and return its claims without any verification
    ///
    /// # Security
    /// The signature is not checked. Never use the result for authorization.
    pub fn extract_claims_unsafe(&self, token: &str) -> Option<Claims> {
        ParsedToken::from_string(token)
            .ok()
            .map(ParsedToken::into_claims)
    }

    /// Whether the token's `exp` has passed
    ///
    /// Unparseable tokens count as expired; tokens without `exp` do not.
    pub fn is_expired(&self, token: &str) -> bool {
        match ParsedToken::from_string(token) {
            Ok(parsed) => parsed
                .claims()
                .expiration()
                .is_some_and(|exp| exp <= self.clock.now()),
            Err(_) => true,
        }
    }

    /// Seconds until `exp`, zero once passed
    ///
    /// `None` when the token does not parse or carries no `exp`.
    pub fn time_to_expiry(&self, token: &str) -> Option<u64> {
        let exp = ParsedToken::from_string(token).ok()?.claims().expiration()?;
        let remaining = exp.saturating_sub(self.clock.now()).max(0);
        Some(remaining as u64)
    }

    /// Drop every cached constraint set
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("cleared constraint cache");
    }

    /// Number of constraint sets built since the service was created
    pub fn constraint_builds(&self) -> usize {
        self.cache.builds()
    }

    fn check(&self, parsed: &ParsedToken) -> std::result::Result<(), Violations> {
        self.cache
            .get(&self.settings)
            .assert_all(parsed, self.clock.as_ref())
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .field("param_data", &self.param_data)
            .field("split_data", &self.split_data)
            .finish_non_exhaustive()
    }
}
