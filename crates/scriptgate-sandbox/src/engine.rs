//! Synchronous engine pass
//!
//! One call, one `boa_engine::Context`. The context is built empty, receives
//! exactly the caller's bindings (plus `fetch` when the capability is
//! enabled), evaluates the script, and is dropped. Nothing survives between
//! calls, so no state can leak across requests.

use std::time::Instant;

use boa_engine::property::Attribute;
use boa_engine::{Context, JsString, JsValue, Source};
use serde_json::Value;

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::fetch;

/// Evaluate `script` with the given named bindings. Runs on the current
/// thread; the async deadline is enforced by the caller, `deadline` is only
/// consulted by deadline-aware builtins like `fetch`.
pub(crate) fn run_script(
    script: &str,
    bindings: &serde_json::Map<String, Value>,
    config: &SandboxConfig,
    deadline: Instant,
) -> Result<Value, SandboxError> {
    let mut context = Context::default();

    // In-engine backstop for the wall-clock deadline: a worker abandoned
    // after timeout cannot spin forever.
    let limits = context.runtime_limits_mut();
    limits.set_loop_iteration_limit(config.loop_iteration_limit);
    limits.set_recursion_limit(config.recursion_limit);

    for (name, value) in bindings {
        let injected = JsValue::from_json(value, &mut context)
            .map_err(|e| SandboxError::Environment(format!("cannot inject '{name}': {e}")))?;
        // Read-only bindings: scripts can see caller values but not rebind
        // them.
        context
            .register_global_property(
                JsString::from(name.as_str()),
                injected,
                Attribute::ENUMERABLE,
            )
            .map_err(|e| SandboxError::Environment(format!("cannot bind '{name}': {e}")))?;
    }

    if config.enable_fetch {
        fetch::register(&mut context, deadline)?;
    }

    let value = context
        .eval(Source::from_bytes(script))
        .map_err(|e| SandboxError::Script {
            message: e.to_string(),
            trace: Some(format!("{e:?}")),
        })?;

    let json = completion_to_json(value, &mut context);

    let size = serde_json::to_vec(&json).map(|b| b.len()).unwrap_or(0);
    if size > config.max_output_bytes {
        return Err(SandboxError::OutputTooLarge {
            max: config.max_output_bytes,
            actual: size,
        });
    }

    Ok(json)
}

/// Convert the completion value to JSON. `undefined` maps to `null`; values
/// with no JSON form (functions, symbols) fall back to their display string.
fn completion_to_json(value: JsValue, context: &mut Context) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    match value.to_json(context) {
        Ok(json) => json,
        Err(_) => Value::String(value.display().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[test]
    fn final_expression_is_captured() {
        let config = SandboxConfig::default();
        let out = run_script("1 + 2", &serde_json::Map::new(), &config, far_deadline()).unwrap();
        assert_eq!(out, serde_json::json!(3));
    }

    #[test]
    fn undefined_completion_maps_to_null() {
        let config = SandboxConfig::default();
        let out =
            run_script("var x = 1;", &serde_json::Map::new(), &config, far_deadline()).unwrap();
        assert_eq!(out, Value::Null);
    }

    #[test]
    fn bindings_are_visible_to_the_script() {
        let config = SandboxConfig::default();
        let mut bindings = serde_json::Map::new();
        bindings.insert("payload".to_string(), serde_json::json!({ "n": 7 }));
        let out = run_script("payload.n * 2", &bindings, &config, far_deadline()).unwrap();
        assert_eq!(out, serde_json::json!(14));
    }

    #[test]
    fn bindings_are_read_only() {
        let config = SandboxConfig::default();
        let mut bindings = serde_json::Map::new();
        bindings.insert("payload".to_string(), serde_json::json!(1));
        // Assignment to a non-writable global is a silent no-op in sloppy
        // mode; the injected value must survive.
        let out = run_script("payload = 99; payload", &bindings, &config, far_deadline()).unwrap();
        assert_eq!(out, serde_json::json!(1));
    }

    #[test]
    fn thrown_error_is_captured_with_trace() {
        let config = SandboxConfig::default();
        let err = run_script(
            "throw new Error('nope')",
            &serde_json::Map::new(),
            &config,
            far_deadline(),
        )
        .unwrap_err();
        match err {
            SandboxError::Script { message, trace } => {
                assert!(message.contains("nope"));
                assert!(trace.is_some());
            }
            other => panic!("expected script error, got {other:?}"),
        }
    }

    #[test]
    fn loop_iteration_limit_stops_runaway_scripts() {
        let config = SandboxConfig {
            loop_iteration_limit: 10_000,
            ..SandboxConfig::default()
        };
        let err = run_script(
            "while (true) {}",
            &serde_json::Map::new(),
            &config,
            far_deadline(),
        )
        .unwrap_err();
        assert!(matches!(err, SandboxError::Script { .. }));
    }

    #[test]
    fn fetch_is_absent_unless_enabled() {
        let config = SandboxConfig::default();
        let out = run_script(
            "typeof fetch",
            &serde_json::Map::new(),
            &config,
            far_deadline(),
        )
        .unwrap();
        assert_eq!(out, serde_json::json!("undefined"));
    }
}
