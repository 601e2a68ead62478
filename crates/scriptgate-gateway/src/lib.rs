//! scriptgate-gateway - Request Gateway
//!
//! Thin HTTP layer binding the isolation boundary and the extraction walker
//! to endpoints:
//! - `GET /health` — liveness, no auth, no rate limit
//! - `POST /execute` — sandboxed script execution
//! - `POST /extract-images` — rich image-node shape
//! - `POST /extract-image-urls` — legacy external/inline URL split
//!
//! Auth and rate limiting short-circuit in middleware before any engine code
//! runs. All state is carried in [`AppState`]; there are no process-wide
//! globals.

pub mod config;
pub mod error;
pub mod rate_limit;

mod auth;
mod routes;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use rate_limit::RateLimiter;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use scriptgate_sandbox::{Sandbox, SandboxConfig};

/// Shared per-process state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub sandbox: Arc<Sandbox>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Build the state tree from a gateway config
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let sandbox_config = SandboxConfig {
            default_timeout_ms: config.default_timeout_ms,
            enable_fetch: config.enable_fetch,
            ..SandboxConfig::default()
        };
        let limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max);
        Self {
            sandbox: Arc::new(Sandbox::new(sandbox_config)),
            limiter: Arc::new(limiter),
            config: Arc::new(config),
        }
    }
}

/// Assemble the router. `/health` sits outside the auth and rate-limit
/// layers; everything else passes the limiter first, then the token gate.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/execute", post(routes::execute))
        .route("/extract-images", post(routes::extract_images))
        .route("/extract-image-urls", post(routes::extract_image_urls))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(protected)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Request logging: method, path, status, latency.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(%method, path, %status, latency_ms, "request");
    } else {
        tracing::info!(%method, path, %status, latency_ms, "request");
    }
    response
}

/// Serve the router on the configured address until the task is cancelled.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let bind = state.config.bind;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "scriptgate listening");
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
