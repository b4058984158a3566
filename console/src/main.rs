use std::sync::Arc;

use console_core::observability::logging::init_tracing;
use dotenvy::dotenv;
use laundrypro_console::config::get_configuration;
use laundrypro_console::services::HttpBackend;
use laundrypro_console::startup::build_router;
use laundrypro_console::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Missing backend URL or API key is fatal here, never per request.
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "laundrypro-console",
        &configuration.observability.log_level,
        &configuration.observability.otlp_endpoint,
    );

    let backend = Arc::new(
        HttpBackend::new(configuration.backend.clone())
            .map_err(|e| anyhow::anyhow!("Failed to construct backend client: {}", e))?,
    );

    let app = build_router(AppState::new(backend));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting laundrypro-console on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
