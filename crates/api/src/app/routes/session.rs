//! Session lifecycle: start a session from an issued token, or log out.
//!
//! Credential checks happen in the login flow that issued the token; this
//! endpoint only stores it. The guard validates it on every navigation.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::{dto::StartSessionRequest, errors};
use crate::middleware::SessionSettings;
use crate::session::{expired_session_cookie, session_cookie};

pub fn router() -> Router {
    Router::new().route("/session", post(start).delete(end))
}

pub async fn start(
    Extension(settings): Extension<SessionSettings>,
    jar: CookieJar,
    Json(body): Json<StartSessionRequest>,
) -> Response {
    let token = body.token.trim();
    if token.is_empty() || token.split('.').count() != 3 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_token",
            "token must be three dot-separated segments",
        );
    }

    tracing::info!("session started");
    let jar = jar.add(session_cookie(&settings.cookie_name, token.to_string()));
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// Logout. Idempotent: without a session cookie nothing is expired.
pub async fn end(Extension(settings): Extension<SessionSettings>, jar: CookieJar) -> Response {
    let had_session = jar.get(&settings.cookie_name).is_some();
    tracing::info!(had_session, "session ended");
    let jar = jar.remove(expired_session_cookie(&settings.cookie_name));
    (jar, StatusCode::NO_CONTENT).into_response()
}
