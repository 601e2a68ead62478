//! Sliding-window rate limiting per source address
//!
//! The limiter is the only process-wide shared resource. Buckets live in a
//! concurrent map; each holds the request timestamps still inside the
//! window.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::error::ApiError;
use crate::AppState;

/// Sliding-window request counter keyed by source IP
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    buckets: DashMap<IpAddr, VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window` per source
    #[must_use]
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            buckets: DashMap::new(),
        }
    }

    /// Record a request from `source`. Returns `false` when the source is
    /// over its cap for the current window.
    pub fn allow(&self, source: IpAddr) -> bool {
        let now = Instant::now();
        let mut bucket = self.buckets.entry(source).or_default();

        while bucket
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            bucket.pop_front();
        }

        if bucket.len() >= self.max_requests {
            return false;
        }
        bucket.push_back(now);
        true
    }
}

/// Middleware: reject over-cap sources before any engine code runs.
pub(crate) async fn enforce(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limiter.allow(peer.ip()) {
        tracing::warn!(source = %peer.ip(), "rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}
