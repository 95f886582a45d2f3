use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppResult;
use crate::handlers::AppState;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let model_configured = state.generator.is_configured();

    info!(model_configured = model_configured, "Health check completed");

    // PDF extraction is in-process, so it is up whenever the server is.
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "pdf_processor": true,
            "model_configured": model_configured
        }
    })))
}

/// Readiness check: the service is only useful once the model is reachable.
pub async fn ready_handler(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    if state.generator.is_configured() {
        info!("Readiness check passed");
        Ok(StatusCode::OK)
    } else {
        info!("Readiness check failed - model API key not configured");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
