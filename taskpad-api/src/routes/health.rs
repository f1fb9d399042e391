/// Health check endpoint
///
/// Reports whether the server is up and whether its todo store answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "store": "postgres: connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// Store adapter and its connectivity
    pub store: String,
}

/// Health check handler
///
/// Always 200; a failing store shows up as `degraded`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, connectivity) = match state.store.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, store = state.store.kind(), "Store health check failed");
            ("degraded", "disconnected")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: format!("{}: {}", state.store.kind(), connectivity),
    })
}
