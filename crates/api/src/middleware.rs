use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use storefront_auth::{AccessGuard, Navigation, NavigationOutcome};

use crate::config::ApiConfig;
use crate::context::PrincipalContext;
use crate::session::{RequestSession, expired_session_cookie};

/// Session cookie and redirect settings shared by the router.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: Arc<str>,
    pub fallback_location: Arc<str>,
}

impl From<&ApiConfig> for SessionSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            cookie_name: config.session_cookie.as_str().into(),
            fallback_location: config.fallback_location.as_str().into(),
        }
    }
}

/// State for one guarded area.
#[derive(Clone)]
pub struct GuardState {
    pub guard: Arc<AccessGuard>,
    pub settings: SessionSettings,
}

/// Admit the request into a guarded area or redirect to the fallback location.
///
/// Denials answer `303 See Other`, so the browser replaces the denied URL
/// instead of keeping it in history. When the guard invalidated the session
/// the response also expires the session cookie.
pub async fn guard_middleware(State(state): State<GuardState>, mut req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let jar = CookieJar::from_headers(req.headers());
    let session = RequestSession::from_headers(req.headers(), &state.settings.cookie_name);

    let outcome = Navigation::new(path)
        .with_fallback(&*state.settings.fallback_location)
        .resolve(&state.guard, &session, Utc::now());

    match outcome {
        NavigationOutcome::Continue { claims, .. } => {
            req.extensions_mut().insert(PrincipalContext::from(claims));
            next.run(req).await
        }
        NavigationOutcome::Replace { location, reason } => {
            // Only cookies the request carried produce a removal header.
            let jar = if session.invalidated() {
                tracing::debug!(%reason, "expiring session cookie");
                jar.remove(expired_session_cookie(&state.settings.cookie_name))
            } else {
                CookieJar::new()
            };
            (jar, Redirect::to(&location)).into_response()
        }
    }
}
