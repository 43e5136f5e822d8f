use axum::{routing::get, Router};

pub mod areas;
pub mod session;
pub mod system;

/// Router for public endpoints (no session required).
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::landing))
        .route("/health", get(system::health))
        .merge(session::router())
}
