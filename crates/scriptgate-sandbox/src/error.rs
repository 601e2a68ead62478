//! Error types for the isolation boundary
//!
//! Every variant here folds into `ExecutionOutcome::Failure` at the sandbox
//! surface. Nothing in this module is allowed to escape as a process-level
//! fault.

/// Sandbox error type
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Script body was empty or whitespace-only
    #[error("missing required field: script")]
    EmptyScript,

    /// Script exceeds the configured size cap
    #[error("script too large: {actual} bytes (max {max})")]
    ScriptTooLarge { max: usize, actual: usize },

    /// Requested timeout is zero or otherwise unusable
    #[error("invalid timeout: {0}ms")]
    InvalidTimeout(u64),

    /// Wall-clock deadline expired before the script finished
    #[error("script execution timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The script raised a runtime fault (throw, type error, parse error)
    #[error("script error: {message}")]
    Script {
        message: String,
        /// Engine error chain, surfaced to callers only behind a debug flag
        trace: Option<String>,
    },

    /// Engine construction or configuration failed
    #[error("sandbox environment error: {0}")]
    Environment(String),

    /// Result value exceeds the configured output cap
    #[error("result too large: {actual} bytes (max {max})")]
    OutputTooLarge { max: usize, actual: usize },
}

impl SandboxError {
    /// Check if this failure identifies a timeout condition
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Detach the diagnostic trace, if one was captured
    #[inline]
    pub fn take_trace(&mut self) -> Option<String> {
        match self {
            Self::Script { trace, .. } => trace.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_identifies_timeout() {
        let err = SandboxError::Timeout { timeout_ms: 50 };
        assert!(err.to_string().contains("timed out"));
        assert!(err.is_timeout());
    }

    #[test]
    fn script_error_carries_trace() {
        let mut err = SandboxError::Script {
            message: "boom".to_string(),
            trace: Some("Error: boom".to_string()),
        };
        assert_eq!(err.take_trace().as_deref(), Some("Error: boom"));
        assert_eq!(err.take_trace(), None);
    }
}
