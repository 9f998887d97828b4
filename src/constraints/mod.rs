//! Constraint engine
//!
//! A [`ConstraintSet`] is the ordered list of checks a decoded token must pass.
//! Sets are built from configuration and cached by the names they were built
//! from (see [`cache`]). Nothing time-dependent is frozen into a set: `ValidAt`
//! only stores its leeway and reads the clock on every evaluation.

pub(crate) mod cache;

use crate::algorithm::Signer;
use crate::clock::Clock;
use crate::config::Settings;
use crate::token::ParsedToken;
use crate::utils::bounds::apply_leeway;

use std::fmt;

/// Names of the supported constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintName {
    /// Header algorithm and signature match the configured signer
    SignedWith,
    /// `iss` equals the configured issuer
    IssuedBy,
    /// `nbf`, `iat` and `exp` admit the current instant
    ValidAt,
    /// `jti` equals the configured identifier
    IdentifiedBy,
    /// `aud` contains the configured audience
    PermittedFor,
}

impl ConstraintName {
    /// Every constraint, in the default evaluation order
    pub const ALL: [ConstraintName; 5] = [
        ConstraintName::SignedWith,
        ConstraintName::IssuedBy,
        ConstraintName::ValidAt,
        ConstraintName::IdentifiedBy,
        ConstraintName::PermittedFor,
    ];

    /// Look up a constraint by its configured name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SignedWith" => Some(ConstraintName::SignedWith),
            "IssuedBy" => Some(ConstraintName::IssuedBy),
            "ValidAt" => Some(ConstraintName::ValidAt),
            "IdentifiedBy" => Some(ConstraintName::IdentifiedBy),
            "PermittedFor" => Some(ConstraintName::PermittedFor),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ConstraintName::SignedWith => "SignedWith",
            ConstraintName::IssuedBy => "IssuedBy",
            ConstraintName::ValidAt => "ValidAt",
            ConstraintName::IdentifiedBy => "IdentifiedBy",
            ConstraintName::PermittedFor => "PermittedFor",
        }
    }
}

impl fmt::Display for ConstraintName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint bound to its expected value
#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    SignedWith(Signer),
    IssuedBy(String),
    ValidAt { leeway: u64 },
    IdentifiedBy(String),
    PermittedFor(String),
}

impl Constraint {
    fn from_settings(name: ConstraintName, settings: &Settings) -> Self {
        match name {
            ConstraintName::SignedWith => Constraint::SignedWith(settings.signer.clone()),
            ConstraintName::IssuedBy => Constraint::IssuedBy(settings.issuer.clone()),
            ConstraintName::ValidAt => Constraint::ValidAt {
                leeway: settings.leeway,
            },
            ConstraintName::IdentifiedBy => Constraint::IdentifiedBy(settings.identifier.clone()),
            ConstraintName::PermittedFor => Constraint::PermittedFor(settings.audience.clone()),
        }
    }

    pub(crate) fn name(&self) -> ConstraintName {
        match self {
            Constraint::SignedWith(_) => ConstraintName::SignedWith,
            Constraint::IssuedBy(_) => ConstraintName::IssuedBy,
            Constraint::ValidAt { .. } => ConstraintName::ValidAt,
            Constraint::IdentifiedBy(_) => ConstraintName::IdentifiedBy,
            Constraint::PermittedFor(_) => ConstraintName::PermittedFor,
        }
    }

    /// Check the token, returning the failure reason
    pub(crate) fn check(&self, token: &ParsedToken, now: i64) -> Result<(), String> {
        let claims = token.claims();
        match self {
            Constraint::SignedWith(signer) => {
                if token.header().algorithm_str() != signer.algorithm().as_str() {
                    return Err("Token signer mismatch".into());
                }
                if !signer.verify(token.signing_input().as_bytes(), token.signature()) {
                    return Err("Token signature mismatch".into());
                }
                Ok(())
            }
            Constraint::IssuedBy(issuer) => match claims.issuer() {
                Some(iss) if iss == issuer => Ok(()),
                _ => Err("The token was not issued by the given issuer".into()),
            },
            Constraint::ValidAt { leeway } => {
                // exp is exclusive: a token is expired at its expiry second
                if claims
                    .expiration()
                    .is_some_and(|exp| now >= apply_leeway(exp, *leeway))
                {
                    return Err("The token is expired".into());
                }
                let skewed = apply_leeway(now, *leeway);
                if claims.not_before().is_some_and(|nbf| skewed < nbf) {
                    return Err("The token cannot be used yet".into());
                }
                if claims.issued_at().is_some_and(|iat| skewed < iat) {
                    return Err("The token was issued in the future".into());
                }
                Ok(())
            }
            Constraint::IdentifiedBy(identifier) => match claims.jwt_id() {
                Some(jti) if jti == identifier => Ok(()),
                _ => Err("The token is not identified with the expected ID".into()),
            },
            Constraint::PermittedFor(audience) => {
                if claims.audience().contains(&audience.as_str()) {
                    Ok(())
                } else {
                    Err("The token is not allowed to be used by this audience".into())
                }
            }
        }
    }
}

/// An ordered, de-duplicated list of constraints
#[derive(Debug, Clone, Default)]
pub(crate) struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Build the set named by `settings.constraint_names`
    ///
    /// Unknown names are skipped; a repeated name keeps its first position.
    pub(crate) fn build(settings: &Settings) -> Self {
        let mut constraints: Vec<Constraint> = Vec::with_capacity(settings.constraint_names.len());

        for raw in &settings.constraint_names {
            let Some(name) = ConstraintName::from_name(raw) else {
                tracing::warn!(constraint = %raw, "skipping unknown constraint");
                continue;
            };
            if constraints.iter().any(|c| c.name() == name) {
                continue;
            }
            constraints.push(Constraint::from_settings(name, settings));
        }

        Self { constraints }
    }

    pub(crate) fn names(&self) -> Vec<ConstraintName> {
        self.constraints.iter().map(Constraint::name).collect()
    }

    /// Evaluate every constraint, collecting all failures
    ///
    /// The clock is read once per call so all time checks agree.
    pub(crate) fn assert_all(&self, token: &ParsedToken, clock: &dyn Clock) -> Result<(), Violations> {
        let now = clock.now();

        let violations: Vec<Violation> = self
            .constraints
            .iter()
            .filter_map(|constraint| {
                constraint
                    .check(token, now)
                    .err()
                    .map(|reason| Violation {
                        constraint: constraint.name(),
                        reason,
                    })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "token violates constraints");
            Err(Violations(violations))
        }
    }
}

/// One failed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub constraint: ConstraintName,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {}", self.constraint, self.reason)
    }
}

/// Every constraint a token failed, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Iterate over the violations
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Names of the failed constraints
    pub fn names(&self) -> Vec<ConstraintName> {
        self.0.iter().map(|v| v.constraint).collect()
    }

    /// Whether the named constraint failed
    pub fn contains(&self, name: ConstraintName) -> bool {
        self.0.iter().any(|v| v.constraint == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("The token violates some mandatory constraints, details:")?;
        for violation in &self.0 {
            write!(f, "\n{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
