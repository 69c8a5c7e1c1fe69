//! Shared helpers for integration tests.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use murmur_gateway::api::build_app;
use murmur_gateway::app_state::AppState;
use murmur_gateway::config::GatewayConfig;
use murmur_gateway::domain::Hub;
use murmur_gateway::persistence::Storage;

/// Configuration with rate limiting off and a fixed secret.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        jwt_secret: "integration-secret".to_string(),
        rate_limit: 0.0,
        ..GatewayConfig::default()
    }
}

/// Builds state over in-memory storage.
pub fn test_state(config: &GatewayConfig) -> AppState {
    AppState::new(config, Storage::in_memory())
}

/// Serves the full application on an ephemeral local port.
pub async fn spawn_server(config: GatewayConfig) -> (SocketAddr, AppState) {
    let state = test_state(&config);
    let app = build_app(state.clone(), &config);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });
    (addr, state)
}

/// Polls the hub until it reports `expected` connections, for up to two
/// seconds.
pub async fn wait_for_connections(hub: &Hub, expected: usize) -> bool {
    for _ in 0..200 {
        if hub.connection_count().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
