//! `GET /health` handler.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::http::request::RequestContext;
use crate::http::server::AppState;

/// Health endpoint body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
}

pub async fn health_check(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> (StatusCode, Json<HealthReport>) {
    let healthy = state.health.is_healthy();
    let status = if healthy {
        tracing::info!(parent: ctx.span(), healthy, "health check completed");
        StatusCode::OK
    } else {
        tracing::warn!(parent: ctx.span(), healthy, "health check completed");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthReport { healthy }))
}
