//! # jwt-bearer - Signed Bearer Tokens with Cached Constraints
//!
//! > Issue and validate HMAC-signed bearer tokens from a single configuration.
//!
//! **jwt-bearer** issues compact JSON Web Tokens carrying an application
//! payload plus the registered claims (`iss`, `aud`, `jti`, `iat`, `nbf`,
//! `exp`) and validates them against an ordered list of named constraints.
//!
//! ## Overview
//!
//! A [`JwtService`] is built once from a [`JwtConfig`]. Every configuration
//! problem (undecodable key, unknown algorithm, bad time offset, excessive
//! leeway) is reported by [`JwtService::new`]; after that, issuing and checking
//! tokens only fails on the token itself.
//!
//! Validation runs the configured constraints in order and reports every
//! failure, not just the first:
//!
//! - **SignedWith**: header `alg` and HMAC signature match the configured signer
//! - **IssuedBy**: `iss` equals the configured issuer
//! - **ValidAt**: `nbf`, `iat` and `exp` admit the current instant (with leeway)
//! - **IdentifiedBy**: `jti` equals the configured identifier
//! - **PermittedFor**: `aud` contains the configured audience
//!
//! Built constraint sets are cached per service, keyed by a fingerprint of the
//! constraint names. `ValidAt` reads the [`Clock`] on every evaluation, so a
//! cached set never validates against a stale instant.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwt_bearer::*;
//!
//! let service = JwtService::new(
//!     &JwtConfig::default()
//!         .signing_key(SigningKey::generate(32)?)
//!         .issuer("https://auth.example.com")
//!         .audience("https://api.example.com")
//!         .expires_at("+1 hour"),
//! )?;
//!
//! let token = service.encode(&serde_json::json!({ "role": "admin" }), Some("user-42"))?;
//!
//! let claims = service.decode(&token)?.into_claims().unwrap();
//! assert_eq!(claims.uid(), Some("user-42"));
//! ```
//!
//! ## Token Lifecycle
//!
//! ```text
//! &str (wire string)
//!     │ parse
//!     ▼
//! ParsedToken (header, claims and signature decoded; nothing trusted)
//!     │ constraint set (cached) + clock
//!     ▼
//! Decoded::Claims | Decoded::Violated / Error::ConstraintsViolated
//! ```
//!
//! [`JwtService::is_valid`] stops at a boolean. [`JwtService::extract_claims_unsafe`],
//! [`JwtService::is_expired`] and [`JwtService::time_to_expiry`] stop after
//! parsing and never check the signature.
//!
//! ## Payloads
//!
//! Scalars are stored under the payload claim (`data` unless changed with
//! [`JwtService::set_param_data`]). Objects and arrays are stored there as JSON
//! text, or flattened into top-level claims after
//! [`JwtService::set_split_data`]. Registered claims are always written by the
//! service and cannot be overridden from a payload.
//!
//! ## Violations
//!
//! With `throw_on_failure` (the default) failures are raised as
//! [`Error::ConstraintsViolated`]; otherwise [`JwtService::decode`] returns
//! [`Decoded::Violated`]. Either way the message reads:
//!
//! ```text
//! The token violates some mandatory constraints, details:
//! - IdentifiedBy: The token is not identified with the expected ID
//! ```
//!
//! ## Security Notes
//!
//! - Only HS256, HS384 and HS512 are accepted; `none` is always rejected
//! - Signatures are compared in constant time
//! - Signing keys must be 16 to 128 bytes and are zeroized on drop
//! - Token, segment, header field and claim sizes are bounded before decoding
//! - Leeway is capped at 300 seconds

// Core modules
pub mod error;
pub(crate) mod limits;
pub(crate) mod utils;

// Signing
pub mod algorithm;
pub mod keys;

// Tokens and claims
pub mod claims;
pub mod token;

// Validation
pub mod clock;
pub mod constraints;

// Configuration and service (main public API)
pub mod config;
pub mod service;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use service::{Decoded, JwtService};

pub use config::{JwtConfig, TimeOffset};

pub use algorithm::{HmacAlgorithm, Signer};
pub use claims::Claims;
pub use clock::{Clock, FrozenClock, SystemClock};
pub use constraints::{ConstraintName, Violation, Violations};
pub use error::{Error, Result};
pub use keys::SigningKey;
pub use token::{ParsedToken, TokenHeader};
