use tracing_subscriber::EnvFilter;

use taxonomy_mapper::api;
use taxonomy_mapper::config::Config;
use taxonomy_mapper::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Embedding provider: {}", config.embedding.provider);
    tracing::info!(
        "Language model: {}",
        if config.llm.is_configured() {
            "configured"
        } else {
            "not configured (keyword fallback only)"
        }
    );

    let state = AppState::new(config.clone()).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
