use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::AreaSummary;
use crate::app::routes::areas::Area;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Public landing location; denied navigations end up here.
pub async fn landing() -> impl IntoResponse {
    let areas: Vec<AreaSummary> = Area::ALL.iter().map(|a| a.summary()).collect();
    Json(serde_json::json!({
        "name": "storefront",
        "areas": areas,
    }))
}
