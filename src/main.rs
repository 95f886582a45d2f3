use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fineprint::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fineprint=debug,tower_http=debug,axum::rejection=trace".into());
    let registry = tracing_subscriber::registry().with(filter);

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    if std::env::var("LOG_FORMAT").map(|f| f.eq_ignore_ascii_case("json")).unwrap_or(false) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(false)).init();
    }

    let config = Config::from_env()?;

    tracing::info!("Starting FinePrint contract analysis service");
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Model: {} (configured: {})", config.gemini_model, config.model_configured());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let state = AppState::with_gemini(config)?;
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
