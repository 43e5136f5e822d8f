//! Role-guarded areas of the storefront.
//!
//! Each area is nested under its own prefix with its own guard; handlers in
//! here can rely on a [`PrincipalContext`] being present.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};

use storefront_auth::{AccessGuard, TokenCodec};

use crate::app::dto::{AreaSummary, WhoAmIResponse};
use crate::context::PrincipalContext;
use crate::middleware::{GuardState, SessionSettings, guard_middleware};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Admin,
    Client,
    Account,
}

impl Area {
    pub const ALL: [Area; 3] = [Area::Admin, Area::Client, Area::Account];

    pub fn name(self) -> &'static str {
        match self {
            Area::Admin => "admin",
            Area::Client => "client",
            Area::Account => "account",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Area::Admin => "/admin",
            Area::Client => "/client",
            Area::Account => "/account",
        }
    }

    /// Roles admitted into the area; empty admits any signed-in user.
    pub fn required_roles(self) -> &'static [&'static str] {
        match self {
            Area::Admin => &["admin"],
            Area::Client => &["client"],
            Area::Account => &[],
        }
    }

    pub fn summary(self) -> AreaSummary {
        AreaSummary {
            name: self.name(),
            path: self.path(),
            required_roles: self.required_roles().to_vec(),
        }
    }

    pub fn guard(self, codec: Arc<dyn TokenCodec>) -> AccessGuard {
        AccessGuard::new(codec, self.required_roles().iter().copied())
    }
}

/// Routes of `area`, wrapped in its guard.
pub fn router(area: Area, codec: Arc<dyn TokenCodec>, settings: SessionSettings) -> Router {
    let state = GuardState {
        guard: Arc::new(area.guard(codec)),
        settings,
    };

    Router::new()
        .route("/", get(move |principal: Extension<PrincipalContext>| index(area, principal)))
        .route("/whoami", get(move |principal: Extension<PrincipalContext>| whoami(area, principal)))
        .layer(axum::middleware::from_fn_with_state(state, guard_middleware))
}

async fn index(area: Area, Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "area": area.name(),
        "welcome": principal.subject().unwrap_or("signed-in user"),
    }))
}

async fn whoami(area: Area, Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(WhoAmIResponse::new(area.name(), &principal))
}
