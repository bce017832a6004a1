use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info};

use character_forge::config::Config;
use character_forge::llm::GeminiClient;
use character_forge::state::AppState;
use character_forge::utils::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::load()?;
    let _guards = init_logging(&config.log_level);

    let backend = GeminiClient::new(&config)?;
    let config = Arc::new(config);
    let state = AppState::new(config.clone(), Arc::new(backend));

    let app = character_forge::app(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "character-forge listening on {} (text model: {}, image model: {})",
        addr, config.gemini_text_model, config.gemini_image_model
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to install ctrl-c handler: {err}");
        return;
    }
    info!("Shutdown signal received");
}
