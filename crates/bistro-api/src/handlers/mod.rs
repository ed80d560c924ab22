//! # Request Handlers
//!
//! One handler per route. Access control is applied by the router, so a
//! handler only ever runs for a caller that already passed its guard.

pub mod carts;
pub mod menu;
pub mod payments;
pub mod reviews;
pub mod stats;
pub mod tokens;
pub mod users;

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;

pub const ROOT_MESSAGE: &str = "Bistro Boss Server Is Running";

/// Liveness text
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Health check including a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!("Store ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    let body = Json(serde_json::json!({
        "status": if status.is_success() { "healthy" } else { "degraded" },
        "service": "bistro-boss",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "payments": state.gateway.provider_name(),
    }));
    (status, body)
}
