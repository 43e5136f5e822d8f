use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::PrincipalContext;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /session`: a token issued by the login flow.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub token: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AreaSummary {
    pub name: &'static str,
    pub path: &'static str,
    /// Empty means any signed-in user.
    pub required_roles: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub area: &'static str,
    pub subject: Option<String>,
    pub roles: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl WhoAmIResponse {
    pub fn new(area: &'static str, principal: &PrincipalContext) -> Self {
        Self {
            area,
            subject: principal.subject().map(str::to_string),
            roles: principal.roles().iter().map(|r| r.as_str().to_string()).collect(),
            expires_at: principal.expires_at(),
        }
    }
}
