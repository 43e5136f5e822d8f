//! HTTP application wiring (Axum router).
//!
//! - `routes/`: handlers, one file per area (public pages, session, guarded areas)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware::SessionSettings;

pub mod dto;
pub mod errors;
pub mod routes;

use routes::areas::{self, Area};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let codec = config.codec();
    let settings = SessionSettings::from(config);

    let mut app = routes::public_router();
    for area in Area::ALL {
        app = app.nest(area.path(), areas::router(area, codec.clone(), settings.clone()));
    }

    app.layer(ServiceBuilder::new().layer(Extension(settings)))
}
