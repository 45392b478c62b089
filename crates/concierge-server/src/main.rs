use anyhow::Result;
use concierge::agent::Agent;
use concierge::opener::BrowserOpener;
use concierge::providers::openai::OpenAiProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod configuration;
mod error;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use configuration::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    concierge::key_manager::load_dotenv();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_file = std::env::var("CONCIERGE_CONFIG_FILE").ok().map(PathBuf::from);
    let settings = Settings::load(config_file.as_deref())?;
    let api_key = settings.api_key()?;

    let provider = OpenAiProvider::new(settings.provider_config(api_key))?;
    let agent = Agent::new(
        Arc::new(settings.agent.clone()),
        Arc::new(provider),
        Arc::new(BrowserOpener),
    )?;
    info!(model = %settings.agent.model, "agent ready");

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(AppState::new(agent)).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()?).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
