use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::{DecodeFailure, Role, RoleSet};

/// Wire shape of a session token payload.
///
/// Every field is optional: the browser-side login flow historically issued
/// tokens without `sub`, and tokens without `roles` are valid for areas that
/// accept any authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiry, seconds since the Unix epoch. Any JSON number is accepted,
    /// fractional seconds included.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_numeric_date"
    )]
    pub exp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

/// Typed claims derived from a session token.
///
/// Recomputed on every guard evaluation; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub roles: RoleSet,
}

impl Claims {
    /// Whether the token has expired at `now`.
    ///
    /// Compared at millisecond resolution: a token is expired once
    /// `exp * 1000 < now_millis`. Tokens without `exp` never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at.timestamp_millis() < now.timestamp_millis(),
            None => false,
        }
    }
}

impl TryFrom<TokenPayload> for Claims {
    type Error = DecodeFailure;

    fn try_from(payload: TokenPayload) -> Result<Self, Self::Error> {
        let expires_at = payload.exp.map(expiry_from_seconds).transpose()?;

        Ok(Self {
            subject: payload.sub,
            expires_at,
            roles: payload.roles.unwrap_or_default().into_iter().collect(),
        })
    }
}

impl From<&Claims> for TokenPayload {
    fn from(claims: &Claims) -> Self {
        Self {
            sub: claims.subject.clone(),
            exp: claims.expires_at.map(|t| t.timestamp_millis() as f64 / 1000.0),
            roles: Some(claims.roles.iter().cloned().collect()),
        }
    }
}

/// Seconds since the epoch to a millisecond-precision timestamp.
///
/// Sub-millisecond fractions are floored, which keeps `exp * 1000 < now_millis`
/// exact for whole-millisecond clocks.
fn expiry_from_seconds(exp: f64) -> Result<DateTime<Utc>, DecodeFailure> {
    if !exp.is_finite() {
        return Err(DecodeFailure::TimestampOutOfRange(exp));
    }
    // `as` saturates; saturated values fall outside chrono's range below.
    let millis = (exp * 1000.0).floor() as i64;
    DateTime::from_timestamp_millis(millis).ok_or(DecodeFailure::TimestampOutOfRange(exp))
}

/// Whole seconds serialize as JSON integers.
fn serialize_numeric_date<S: Serializer>(exp: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match exp {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => serializer.serialize_i64(*v as i64),
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn missing_roles_default_to_empty_set() {
        let claims = Claims::try_from(TokenPayload {
            sub: None,
            exp: Some(1_700_000_000.0),
            roles: None,
        })
        .unwrap();

        assert!(claims.roles.is_empty());
        assert_eq!(claims.expires_at, Some(at(1_700_000_000)));
    }

    #[test]
    fn out_of_range_expiry_is_rejected() {
        for exp in [f64::MAX, -f64::MAX, f64::INFINITY, 1e300] {
            let err = Claims::try_from(TokenPayload {
                exp: Some(exp),
                ..TokenPayload::default()
            })
            .unwrap_err();

            assert_eq!(err, DecodeFailure::TimestampOutOfRange(exp));
        }

        let err = Claims::try_from(TokenPayload {
            exp: Some(f64::NAN),
            ..TokenPayload::default()
        })
        .unwrap_err();
        assert!(matches!(err, DecodeFailure::TimestampOutOfRange(v) if v.is_nan()));
    }

    #[test]
    fn fractional_expiry_keeps_milliseconds() {
        let payload: TokenPayload = serde_json::from_str(r#"{"exp": 1750000060.5}"#).unwrap();
        let claims = Claims::try_from(payload).unwrap();

        assert_eq!(
            claims.expires_at,
            DateTime::from_timestamp_millis(1_750_000_060_500)
        );
        assert!(!claims.is_expired(DateTime::from_timestamp_millis(1_750_000_060_500).unwrap()));
        assert!(claims.is_expired(DateTime::from_timestamp_millis(1_750_000_060_501).unwrap()));
    }

    #[test]
    fn integral_float_expiry_is_accepted() {
        let payload: TokenPayload = serde_json::from_str(r#"{"exp": 1750000060.0, "roles": ["admin"]}"#).unwrap();
        let claims = Claims::try_from(payload).unwrap();
        assert_eq!(claims.expires_at, Some(at(1_750_000_060)));
    }

    #[test]
    fn whole_second_expiry_serializes_as_integer() {
        let json = serde_json::to_value(TokenPayload {
            exp: Some(1_750_000_060.0),
            ..TokenPayload::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "exp": 1_750_000_060_i64 }));

        let json = serde_json::to_value(TokenPayload {
            exp: Some(1_750_000_060.25),
            ..TokenPayload::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "exp": 1_750_000_060.25 }));
    }

    #[test]
    fn expiry_uses_millisecond_comparison() {
        let claims = Claims {
            subject: None,
            expires_at: Some(at(1_000)),
            roles: RoleSet::new(),
        };

        assert!(!claims.is_expired(at(1_000)));
        assert!(claims.is_expired(at(1_000) + Duration::milliseconds(1)));
        // Sub-millisecond drift past `exp` is not yet expiry.
        assert!(!claims.is_expired(at(1_000) + Duration::microseconds(500)));
        assert!(!claims.is_expired(at(999)));
    }

    #[test]
    fn claims_without_expiry_never_expire() {
        let claims = Claims {
            subject: Some("u-1".to_string()),
            expires_at: None,
            roles: RoleSet::new(),
        };
        assert!(!claims.is_expired(at(i32::MAX as i64)));
    }
}
