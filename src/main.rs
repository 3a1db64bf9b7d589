use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use lingo_gateway::app::build_app;
use lingo_gateway::infrastructure::config::{Config, LogFormat};
use lingo_gateway::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Lingo Gateway on {}:{}",
        config.host,
        config.port
    );

    // Wire providers, services and controllers
    let state = build_app(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        e
    })?;

    // Start HTTP server with all routes
    start_http_server(Arc::new(config), state).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "lingo_gateway=debug,tower_http=debug"
    } else {
        "lingo_gateway=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
