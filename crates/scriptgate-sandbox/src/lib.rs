//! scriptgate-sandbox - Isolation Boundary
//!
//! Runs caller-supplied script text inside a restricted interpreter:
//! - Fresh engine context per call, never reused across requests
//! - Caller context injected as named bindings; no other host state reachable
//! - Wall-clock deadline with in-engine iteration/recursion backstops
//! - Every fault captured as a structured failure, never a process fault
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptgate_sandbox::{ExecutionRequest, Sandbox, SandboxConfig};
//!
//! # async fn example() {
//! let sandbox = Sandbox::new(SandboxConfig::new());
//! let outcome = sandbox
//!     .execute(ExecutionRequest::new("1 + 2"))
//!     .await;
//! assert!(outcome.is_success());
//! # }
//! ```

pub mod config;
pub mod error;

mod engine;
mod fetch;

pub use config::SandboxConfig;
pub use error::SandboxError;

use std::time::{Duration, Instant};

use serde_json::Value;

/// A single execution request
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionRequest {
    /// Script text to evaluate. Mandatory, non-empty.
    pub script: String,
    /// Named values made visible to the script. Plain data only; values can
    /// never be references back into the host process.
    pub context: serde_json::Map<String, Value>,
    /// Per-request deadline override in milliseconds
    pub timeout_ms: Option<u64>,
}

impl ExecutionRequest {
    /// Create a request for the given script
    #[inline]
    #[must_use]
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Add a named binding
    #[inline]
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, value: Value) -> Self {
        self.context.insert(name.into(), value);
        self
    }

    /// Override the deadline
    #[inline]
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Result of an execution: exactly one variant is populated
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionOutcome {
    /// The script completed; `value` is its final expression value
    Success { value: Value },
    /// The script (or the boundary itself) failed
    Failure {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
}

impl ExecutionOutcome {
    /// Check if the execution succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<SandboxError> for ExecutionOutcome {
    fn from(mut err: SandboxError) -> Self {
        let trace = err.take_trace();
        Self::Failure {
            message: err.to_string(),
            trace,
        }
    }
}

/// The isolation boundary
///
/// Stateless apart from its configuration; safe to share across concurrent
/// requests. Each `execute` call owns a fresh engine context.
#[derive(Debug, Clone)]
pub struct Sandbox {
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a sandbox with the given limits
    #[inline]
    #[must_use]
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Execute a request under the configured isolation guarantees.
    ///
    /// Never returns `Err` and never panics across the boundary: timeouts,
    /// script faults and environment failures all surface as
    /// `ExecutionOutcome::Failure`.
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionOutcome {
        match self.try_execute(request).await {
            Ok(value) => ExecutionOutcome::Success { value },
            Err(err) => {
                if err.is_timeout() {
                    tracing::warn!(error = %err, "sandbox execution timed out");
                } else {
                    tracing::debug!(error = %err, "sandbox execution failed");
                }
                err.into()
            }
        }
    }

    async fn try_execute(&self, request: ExecutionRequest) -> Result<Value, SandboxError> {
        if request.script.trim().is_empty() {
            return Err(SandboxError::EmptyScript);
        }
        if request.script.len() > self.config.max_script_bytes {
            return Err(SandboxError::ScriptTooLarge {
                max: self.config.max_script_bytes,
                actual: request.script.len(),
            });
        }

        let timeout_ms = request.timeout_ms.unwrap_or(self.config.default_timeout_ms);
        if timeout_ms == 0 {
            return Err(SandboxError::InvalidTimeout(timeout_ms));
        }

        let budget = Duration::from_millis(timeout_ms);
        let deadline = Instant::now() + budget;
        let config = self.config.clone();
        let script = request.script;
        let bindings = request.context;

        let handle = tokio::task::spawn_blocking(move || {
            engine::run_script(&script, &bindings, &config, deadline)
        });

        match tokio::time::timeout(budget, handle).await {
            // Deadline fired: the response is bounded here; the abandoned
            // worker is bounded by the engine's runtime limits and owns no
            // host-visible state.
            Err(_) => Err(SandboxError::Timeout { timeout_ms }),
            Ok(Err(join_err)) => Err(SandboxError::Environment(format!(
                "execution task failed: {join_err}"
            ))),
            Ok(Ok(result)) => result,
        }
    }
}
