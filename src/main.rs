//! murmur-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use murmur_gateway::api;
use murmur_gateway::app_state::AppState;
use murmur_gateway::config::GatewayConfig;
use murmur_gateway::domain::Hub;
use murmur_gateway::persistence::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = GatewayConfig::from_env().context("loading configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting murmur-gateway");
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set, using the built-in development secret");
    }

    // Build storage and application state
    let storage = Storage::from_config(&config)
        .await
        .context("initializing storage")?;
    let app_state = AppState::new(&config, storage);
    let hub = app_state.hub.clone();

    let app = api::build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(hub))
    .await
    .context("serving")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Plain text by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves on Ctrl-C and closes every push connection.
async fn shutdown_signal(hub: Hub) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested, closing push connections");
    hub.shutdown();
}
