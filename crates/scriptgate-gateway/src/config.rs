//! Gateway configuration
//!
//! Explicit configuration object handed to the router at startup. The secret
//! token and limiter parameters live here instead of process-wide globals so
//! the engines stay testable in isolation.

use std::net::SocketAddr;
use std::time::Duration;

use scriptgate_extract::TreeBudget;

/// Runtime configuration for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Secret every state-changing request must present in `Authorization`
    pub secure_token: String,
    /// Sliding rate-limit window per source address
    pub rate_limit_window: Duration,
    /// Requests allowed per source within the window
    pub rate_limit_max: usize,
    /// Sandbox deadline applied when a request carries none
    pub default_timeout_ms: u64,
    /// Return sandbox diagnostic traces to callers. Off by default: traces
    /// are operator-facing.
    pub expose_traces: bool,
    /// Offer the `fetch` capability to sandboxed scripts
    pub enable_fetch: bool,
    /// Traversal budget for structured-tree extraction
    pub tree_budget: TreeBudget,
}

impl GatewayConfig {
    /// Create a config with the observed deployment defaults. The token has
    /// no default on purpose.
    #[must_use]
    pub fn new(secure_token: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            secure_token: secure_token.into(),
            rate_limit_window: Duration::from_secs(15 * 60),
            rate_limit_max: 100,
            default_timeout_ms: 1_000,
            expose_traces: false,
            enable_fetch: false,
            tree_budget: TreeBudget::default(),
        }
    }

    /// Set the rate-limit window and cap
    #[inline]
    #[must_use]
    pub fn with_rate_limit(mut self, window: Duration, max: usize) -> Self {
        self.rate_limit_window = window;
        self.rate_limit_max = max;
        self
    }

    /// Expose sandbox traces in failure responses
    #[inline]
    #[must_use]
    pub fn with_exposed_traces(mut self) -> Self {
        self.expose_traces = true;
        self
    }
}
