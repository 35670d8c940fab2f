use axum::extract::State;
use axum::Json;
use chrono::Utc;
use fwhub_core::types::Timestamp;
use fwhub_db::store::StorageKind;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the durable store stopped answering.
    pub status: &'static str,
    pub timestamp: Timestamp,
    /// Active storage backend: `postgres` or `in-memory`.
    pub storage: &'static str,
    /// Whether a durable store is active and reachable.
    pub database_connected: bool,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let kind = state.store.kind();
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            false
        }
    };

    let status = if reachable { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        timestamp: Utc::now(),
        storage: kind.label(),
        database_connected: kind == StorageKind::Durable && reachable,
        version: env!("CARGO_PKG_VERSION"),
    })
}
