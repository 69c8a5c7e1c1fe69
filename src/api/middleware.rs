//! HTTP middleware: per-client rate limiting, CORS, and security headers.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Instant;

use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::app_state::AppState;
use crate::error::GatewayError;

/// Buckets idle for this long are forgotten on the next sweep.
const IDLE_BUCKET_SECS: f64 = 600.0;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter keyed by client IP.
///
/// Each client may burst up to `burst` requests, refilled at `rate` tokens
/// per second. The lock is never held across an await point.
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

impl RateLimiter {
    /// Creates a limiter refilling `rate` tokens per second up to `burst`.
    ///
    /// A non-positive `rate` disables limiting.
    #[must_use]
    pub fn new(rate: f64, burst: u32) -> Self {
        Self {
            rate,
            burst: f64::from(burst.max(1)),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Takes one token for `client`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RateLimited`] with the wait until the next
    /// token when the bucket is empty.
    pub fn check(&self, client: IpAddr) -> Result<(), GatewayError> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Result<(), GatewayError> {
        if self.rate <= 0.0 || !self.rate.is_finite() {
            return Ok(());
        }

        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if buckets.len() > 10_000 {
            buckets.retain(|_, b| now.duration_since(b.last_refill).as_secs_f64() < IDLE_BUCKET_SECS);
        }

        let bucket = buckets.entry(client).or_insert(Bucket {
            tokens: self.burst,
            last_refill: now,
        });
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last_refill = now;

        if bucket.tokens < 1.0 {
            let wait_secs = (1.0 - bucket.tokens) / self.rate;
            return Err(GatewayError::RateLimited {
                retry_after_ms: (wait_secs * 1000.0).ceil() as u64,
            });
        }
        bucket.tokens -= 1.0;
        Ok(())
    }
}

/// Axum middleware enforcing [`RateLimiter`] per peer address.
///
/// Requests served without connect info (e.g. in-process tests) share the
/// unspecified address bucket.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip());

    match state.rate_limiter.check(client) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(%client, path = %request.uri().path(), "rate limit exceeded");
            err.into_response()
        }
    }
}

/// Builds the CORS layer for `origins`, or `None` when the list is empty.
///
/// `*` allows any origin; invalid entries are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

/// Adds hardening headers to every response that does not already set
/// them.
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let headers: [(HeaderName, &'static str); 4] = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::REFERRER_POLICY, "no-referrer"),
        (header::CONTENT_SECURITY_POLICY, "default-src 'self'"),
    ];
    headers.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ))
    })
}
