//! Environment-driven configuration for the API binary.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use storefront_auth::{DEFAULT_FALLBACK_LOCATION, Hs256Codec, PayloadCodec, TokenCodec};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SESSION_COOKIE: &str = "session";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `STOREFRONT_BIND`
    pub bind_addr: SocketAddr,

    /// `JWT_SECRET`; when absent tokens are read without signature checks.
    pub jwt_secret: Option<String>,

    /// `SESSION_COOKIE`
    pub session_cookie: String,

    /// `FALLBACK_LOCATION`: where denied navigations are redirected.
    pub fallback_location: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: None,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            fallback_location: DEFAULT_FALLBACK_LOCATION.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (blank values count as unset).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = var("STOREFRONT_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("STOREFRONT_BIND", &bind, e.to_string()))?;

        let session_cookie = var("SESSION_COOKIE").unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        if !session_cookie
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::invalid(
                "SESSION_COOKIE",
                session_cookie,
                "cookie names may only contain ASCII letters, digits, '_' and '-'",
            ));
        }

        let fallback_location = var("FALLBACK_LOCATION").unwrap_or_else(|| DEFAULT_FALLBACK_LOCATION.to_string());
        if !fallback_location.starts_with('/') {
            return Err(ConfigError::invalid(
                "FALLBACK_LOCATION",
                fallback_location,
                "must be an absolute path",
            ));
        }

        Ok(Self {
            bind_addr,
            jwt_secret: var("JWT_SECRET"),
            session_cookie,
            fallback_location,
        })
    }

    /// Token codec matching the configured secret.
    pub fn codec(&self) -> Arc<dyn TokenCodec> {
        match &self.jwt_secret {
            Some(secret) => Arc::new(Hs256Codec::new(secret.as_bytes())),
            None => {
                tracing::warn!("JWT_SECRET not set; session tokens will not be signature-checked");
                Arc::new(PayloadCodec::new())
            }
        }
    }
}
