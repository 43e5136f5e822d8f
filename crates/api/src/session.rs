//! Per-request session backed by the session cookie.
//!
//! The cookie is the primary token holder; an `Authorization: Bearer` header
//! is the lower-priority lookup used when no cookie is present (API clients,
//! scripts). Invalidation is recorded so the response can expire the cookie.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use storefront_auth::{InMemorySessionStore, LayeredSessionStore, SessionStore};

pub struct RequestSession {
    store: LayeredSessionStore<InMemorySessionStore, InMemorySessionStore>,
    invalidated: AtomicBool,
}

impl RequestSession {
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let jar = CookieJar::from_headers(headers);
        let cookie = jar
            .get(cookie_name)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty());

        let primary = match cookie {
            Some(token) => InMemorySessionStore::with_token(token),
            None => InMemorySessionStore::new(),
        };
        let fallback = match bearer_token(headers) {
            Some(token) => InMemorySessionStore::with_token(token),
            None => InMemorySessionStore::new(),
        };

        Self {
            store: LayeredSessionStore::new(primary, fallback),
            invalidated: AtomicBool::new(false),
        }
    }

    /// Whether the session was cleared while handling this request.
    pub fn invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire)
    }
}

impl SessionStore for RequestSession {
    fn get(&self) -> Option<String> {
        self.store.get()
    }

    fn set(&self, token: String) {
        self.store.set(token);
    }

    fn clear(&self) {
        self.store.clear();
        self.invalidated.store(true, Ordering::Release);
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Cookie carrying `token` for the whole site.
pub fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie to pass to `CookieJar::remove` to expire the session cookie.
pub fn expired_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let h = headers(&[
            (header::COOKIE, "theme=dark; session=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        let session = RequestSession::from_headers(&h, "session");
        assert_eq!(session.get().as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_the_fallback() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer from-header")]);
        let session = RequestSession::from_headers(&h, "session");
        assert_eq!(session.get().as_deref(), Some("from-header"));
    }

    #[test]
    fn empty_values_count_as_absent() {
        let h = headers(&[
            (header::COOKIE, "session="),
            (header::AUTHORIZATION, "Bearer   "),
        ]);
        let session = RequestSession::from_headers(&h, "session");
        assert_eq!(session.get(), None);

        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(RequestSession::from_headers(&h, "session").get(), None);
    }

    #[test]
    fn clear_is_recorded() {
        let h = headers(&[(header::COOKIE, "session=abc")]);
        let session = RequestSession::from_headers(&h, "session");
        assert!(!session.invalidated());

        session.clear();
        assert!(session.invalidated());
        assert_eq!(session.get(), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("session", "tok".to_string());
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
