pub mod analyze;
pub mod feedback;
pub mod health;

pub use analyze::*;
pub use feedback::*;
pub use health::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::logging_middleware;
use crate::services::{ContentGenerator, GeminiClient, PdfProcessor};

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn ContentGenerator>,
    pub pdf_processor: PdfProcessor,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn ContentGenerator>) -> Self {
        let pdf_processor = PdfProcessor::new(config.max_text_length);
        Self {
            config: Arc::new(config),
            generator,
            pdf_processor,
        }
    }

    /// State backed by the hosted Gemini model.
    pub fn with_gemini(config: Config) -> AppResult<Self> {
        let client = GeminiClient::from_config(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/binary", post(analyze_binary_handler))
        .route("/feedback", post(feedback_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
