//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::api::middleware::RateLimiter;
use crate::auth::{AuthGate, JwtAuthGate};
use crate::config::GatewayConfig;
use crate::domain::Hub;
use crate::persistence::Storage;
use crate::service::{AccountService, PostService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast hub owning the live push connections.
    pub hub: Hub,
    /// Bearer credential validation for REST routes and the handshake.
    pub auth: Arc<dyn AuthGate>,
    /// Registration and login.
    pub account_service: Arc<AccountService>,
    /// Post creation and listing; publishes to the hub.
    pub post_service: Arc<PostService>,
    /// Per-client request budget.
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wires services together and starts the hub coordinator.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(config: &GatewayConfig, storage: Storage) -> Self {
        let storage = Arc::new(storage);
        let hub = Hub::start(config.outbound_queue_capacity);

        let tokens = Arc::new(JwtAuthGate::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_ttl(),
        ));
        let auth: Arc<dyn AuthGate> = Arc::clone(&tokens) as Arc<dyn AuthGate>;

        Self {
            hub: hub.clone(),
            auth,
            account_service: Arc::new(AccountService::new(Arc::clone(&storage), tokens)),
            post_service: Arc::new(PostService::new(storage, hub)),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit, config.rate_burst)),
        }
    }
}
