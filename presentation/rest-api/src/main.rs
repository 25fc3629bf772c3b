use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, server::Server};

/// REST API Entry Point
///
/// Chat surface for the Azure MCP assistant. Wires the MCP client, the Azure
/// OpenAI model and the agent use cases, then starts the HTTP server.
/// - config/: Application configuration (server, CORS, agent)
/// - setup/: Dependency injection and server setup
/// - api/: Route handlers and DTOs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 2. Load environment variables
    dotenv().ok();

    // 3. Environment variable checks
    openai::config::warn_missing_vars();

    // 4. Load configuration
    let config = AppConfig::from_env()?;

    // 5. Wire dependencies
    let container = DependencyContainer::new(&config)?;

    // 6. Run server
    Server::run(config, container).await?;

    Ok(())
}
