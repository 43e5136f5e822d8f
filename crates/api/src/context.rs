use chrono::{DateTime, Utc};
use serde::Serialize;

use storefront_auth::{Claims, RoleSet};

/// Authenticated caller for a request inside a guarded area.
///
/// Inserted into request extensions by the guard middleware; handlers outside
/// guarded areas never see one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalContext {
    subject: Option<String>,
    roles: RoleSet,
    expires_at: Option<DateTime<Utc>>,
}

impl PrincipalContext {
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl From<Claims> for PrincipalContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.subject,
            roles: claims.roles,
            expires_at: claims.expires_at,
        }
    }
}
