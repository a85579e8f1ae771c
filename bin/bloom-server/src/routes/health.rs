//! Liveness and database readiness.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bloom_types::{ErrorBody, HealthResponse};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(HealthResponse, ErrorBody)))]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Report the server version once the guestbook database answers a trivial query.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and database are up", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = ErrorBody)
    )
)]
pub async fn get_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ServerError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ServerError::Unavailable(format!("database ping failed: {e}")))?;
    Ok(Json(HealthResponse::ok(env!("CARGO_PKG_VERSION"))))
}
