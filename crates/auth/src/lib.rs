//! `storefront-auth` — session validation and route access control.
//!
//! This crate is decoupled from HTTP: the guard reads a [`SessionStore`],
//! decodes through a [`TokenCodec`] and returns a decision for the caller's
//! router to act on.

pub mod claims;
pub mod codec;
pub mod guard;
pub mod navigation;
pub mod roles;
pub mod session;

pub use claims::{Claims, TokenPayload};
pub use codec::{DecodeFailure, Hs256Codec, PayloadCodec, TokenCodec};
pub use guard::{AccessDecision, AccessGuard, DenyReason};
pub use navigation::{DEFAULT_FALLBACK_LOCATION, Navigation, NavigationOutcome};
pub use roles::{Role, RoleSet};
pub use session::{InMemorySessionStore, LayeredSessionStore, SessionStore};
