//! REST API layer: route handlers, DTOs, middleware, and router
//! composition.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::ws::handler::ws_handler;

/// Builds the REST and WebSocket routes that count against the per-client
/// rate limit.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .route("/ws", get(ws_handler))
}

/// Builds the complete application: routes, middleware, and state.
pub fn build_app(state: AppState, config: &GatewayConfig) -> Router {
    let limited = build_router().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::rate_limit,
    ));

    let router = Router::new()
        .merge(limited)
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    let mut router = router.layer(timeout_layer(Duration::from_secs(
        config.request_timeout_secs,
    )));
    if config.security_headers {
        router = middleware::with_security_headers(router);
    }
    if let Some(cors) = middleware::cors_layer(&config.cors_origins) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Answers `408 Request Timeout` when a request runs longer than `limit`.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let app: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(20)));

        let Ok(request) = Request::builder().uri("/slow").body(Body::empty()) else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router call failed");
        };
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
