//! Route access guard.
//!
//! A pure decision over (current token, required roles, now). The only side
//! effect is invalidating the session when the token is malformed or expired;
//! a missing token or a role mismatch leaves the session untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{Claims, Role, RoleSet, SessionStore, TokenCodec};

/// Why access was denied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    #[error("no session token")]
    NoToken,

    #[error("session token has expired")]
    Expired,

    #[error("session token is malformed")]
    MalformedToken,

    #[error("role not allowed")]
    RoleNotAllowed,
}

impl DenyReason {
    /// Whether this outcome invalidates the session.
    pub fn invalidates_session(self) -> bool {
        matches!(self, Self::Expired | Self::MalformedToken)
    }
}

/// Outcome of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gates a protected area on session validity and role membership.
#[derive(Clone)]
pub struct AccessGuard {
    codec: Arc<dyn TokenCodec>,
    required_roles: RoleSet,
}

impl AccessGuard {
    /// Guard admitting callers holding at least one of `required_roles`.
    ///
    /// An empty role list admits any authenticated caller.
    pub fn new<I, R>(codec: Arc<dyn TokenCodec>, required_roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            codec,
            required_roles: required_roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Guard admitting any caller with a decodable, unexpired token.
    pub fn any_authenticated(codec: Arc<dyn TokenCodec>) -> Self {
        Self {
            codec,
            required_roles: RoleSet::new(),
        }
    }

    pub fn required_roles(&self) -> &RoleSet {
        &self.required_roles
    }

    /// Evaluate access, returning the caller's claims on success.
    pub fn check<S>(&self, session: &S, now: DateTime<Utc>) -> Result<Claims, DenyReason>
    where
        S: SessionStore + ?Sized,
    {
        let Some(token) = session.get() else {
            return Err(DenyReason::NoToken);
        };

        let claims = match self.codec.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "invalidating session: token does not decode");
                session.clear();
                return Err(DenyReason::MalformedToken);
            }
        };

        if claims.is_expired(now) {
            tracing::warn!(
                expires_at = ?claims.expires_at,
                subject = claims.subject.as_deref().unwrap_or("-"),
                "invalidating session: token expired"
            );
            session.clear();
            return Err(DenyReason::Expired);
        }

        if self.required_roles.is_empty() || self.required_roles.intersects(&claims.roles) {
            Ok(claims)
        } else {
            tracing::debug!(
                required = %self.required_roles,
                held = %claims.roles,
                "no required role held"
            );
            Err(DenyReason::RoleNotAllowed)
        }
    }

    /// Evaluate access as an [`AccessDecision`].
    pub fn evaluate<S>(&self, session: &S, now: DateTime<Utc>) -> AccessDecision
    where
        S: SessionStore + ?Sized,
    {
        match self.check(session, now) {
            Ok(_) => AccessDecision::Allow,
            Err(reason) => AccessDecision::Deny(reason),
        }
    }
}

impl core::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("required_roles", &self.required_roles)
            .finish_non_exhaustive()
    }
}
