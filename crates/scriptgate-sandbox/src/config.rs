//! Sandbox configuration
//!
//! All limits are explicit so the boundary can be tuned per deployment
//! without touching engine code.

/// Resource limits and capability switches for the isolation boundary
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Wall-clock deadline applied when a request does not carry its own
    pub default_timeout_ms: u64,
    /// Maximum accepted script size in bytes
    pub max_script_bytes: usize,
    /// Maximum serialized result size in bytes
    pub max_output_bytes: usize,
    /// Engine loop-iteration cap; bounds the lifetime of a worker abandoned
    /// after the wall-clock deadline fired
    pub loop_iteration_limit: u64,
    /// Engine recursion cap
    pub recursion_limit: usize,
    /// Offer the `fetch` builtin to scripts. Off by default: no network
    /// capability is ambient inside the boundary.
    pub enable_fetch: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 1_000,
            max_script_bytes: 64 * 1024,
            max_output_bytes: 1024 * 1024,
            loop_iteration_limit: 10_000_000,
            recursion_limit: 512,
            enable_fetch: false,
        }
    }
}

impl SandboxConfig {
    /// Create a config with the observed defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default wall-clock deadline
    #[inline]
    #[must_use]
    pub fn with_default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Offer the `fetch` capability to scripts
    #[inline]
    #[must_use]
    pub fn with_fetch(mut self) -> Self {
        self.enable_fetch = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_deployment() {
        let config = SandboxConfig::new();
        assert_eq!(config.default_timeout_ms, 1_000);
        assert!(!config.enable_fetch);
    }

    #[test]
    fn builders_apply() {
        let config = SandboxConfig::new().with_default_timeout_ms(5_000).with_fetch();
        assert_eq!(config.default_timeout_ms, 5_000);
        assert!(config.enable_fetch);
    }
}
