//! Navigation attempts into guarded areas.
//!
//! A [`Navigation`] is evaluated exactly once: resolving it consumes it and
//! yields a [`NavigationOutcome`]. A new attempt needs a new `Navigation`, so
//! no decision is ever carried across attempts.

use chrono::{DateTime, Utc};

use crate::{AccessDecision, AccessGuard, Claims, DenyReason, SessionStore};

/// Public location denied navigations are sent to.
pub const DEFAULT_FALLBACK_LOCATION: &str = "/";

/// What the router should do with an evaluated navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Render the protected target for the admitted caller.
    Continue { target: String, claims: Claims },

    /// Replace the current location (no new history entry) with `location`.
    Replace { location: String, reason: DenyReason },
}

impl NavigationOutcome {
    pub fn decision(&self) -> AccessDecision {
        match self {
            Self::Continue { .. } => AccessDecision::Allow,
            Self::Replace { reason, .. } => AccessDecision::Deny(*reason),
        }
    }
}

/// An attempted navigation that has not been evaluated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    target: String,
    fallback: String,
}

impl Navigation {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            fallback: DEFAULT_FALLBACK_LOCATION.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Evaluate the guard for this attempt.
    pub fn resolve<S>(self, guard: &AccessGuard, session: &S, now: DateTime<Utc>) -> NavigationOutcome
    where
        S: SessionStore + ?Sized,
    {
        match guard.check(session, now) {
            Ok(claims) => {
                tracing::debug!(target_path = %self.target, "navigation allowed");
                NavigationOutcome::Continue {
                    target: self.target,
                    claims,
                }
            }
            Err(reason) => {
                tracing::info!(
                    target_path = %self.target,
                    reason = %reason,
                    fallback = %self.fallback,
                    "navigation denied"
                );
                NavigationOutcome::Replace {
                    location: self.fallback,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hs256Codec, InMemorySessionStore, Role, TokenPayload};
    use chrono::Duration;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    fn guard() -> AccessGuard {
        AccessGuard::new(Arc::new(Hs256Codec::new("nav")), ["client"])
    }

    #[test]
    fn allowed_navigation_continues_to_target() {
        let token = Hs256Codec::new("nav")
            .encode(&TokenPayload {
                sub: Some("c-7".to_string()),
                exp: Some((now() + Duration::minutes(5)).timestamp() as f64),
                roles: Some(vec![Role::new("client")]),
            })
            .unwrap();
        let session = InMemorySessionStore::with_token(token);

        let outcome = Navigation::new("/client/orders").resolve(&guard(), &session, now());

        assert_eq!(outcome.decision(), AccessDecision::Allow);
        let NavigationOutcome::Continue { target, claims } = outcome else {
            panic!("expected navigation to continue");
        };
        assert_eq!(target, "/client/orders");
        assert_eq!(claims.subject.as_deref(), Some("c-7"));
    }

    #[test]
    fn denied_navigation_replaces_with_fallback() {
        let session = InMemorySessionStore::new();

        let outcome = Navigation::new("/client/orders").resolve(&guard(), &session, now());

        assert_eq!(
            outcome,
            NavigationOutcome::Replace {
                location: "/".to_string(),
                reason: DenyReason::NoToken,
            }
        );
    }

    #[test]
    fn custom_fallback_is_honoured() {
        let session = InMemorySessionStore::with_token("garbage");

        let outcome = Navigation::new("/client")
            .with_fallback("/login")
            .resolve(&guard(), &session, now());

        assert_eq!(outcome.decision(), AccessDecision::Deny(DenyReason::MalformedToken));
        assert_eq!(
            outcome,
            NavigationOutcome::Replace {
                location: "/login".to_string(),
                reason: DenyReason::MalformedToken,
            }
        );
    }
}
