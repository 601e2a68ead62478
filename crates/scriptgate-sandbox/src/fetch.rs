//! Opt-in network capability
//!
//! A synchronous `fetch(url)` bridge over `reqwest::blocking`. It is never
//! ambient: the engine registers it only when the deployment enables it, and
//! scripts receive it as an explicit named binding like any other context
//! value. Each call's HTTP timeout is clamped to the remaining execution
//! deadline, so a fetch cannot outlive the request budget.

use std::cell::Cell;
use std::io::Read;
use std::time::{Duration, Instant};

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{js_string, Context, JsNativeError, JsString, JsValue, NativeFunction};

use crate::error::SandboxError;

/// Response body cap.
const MAX_FETCH_BODY: usize = 256 * 1024;

thread_local! {
    // `NativeFunction::from_copy_closure` requires a `Copy` closure, so the
    // deadline travels through a thread-local. Engine passes are
    // single-threaded and set this before every run.
    static FETCH_DEADLINE: Cell<Option<Instant>> = const { Cell::new(None) };
}

/// Register the global `fetch(url)` binding, bound to `deadline`.
pub(crate) fn register(context: &mut Context, deadline: Instant) -> Result<(), SandboxError> {
    FETCH_DEADLINE.with(|d| d.set(Some(deadline)));

    let fetch_fn = NativeFunction::from_copy_closure(|_this, args, ctx| {
        let url = args
            .first()
            .map(|v| v.to_string(ctx))
            .transpose()?
            .map(|s| s.to_std_string_escaped())
            .unwrap_or_default();

        if url.is_empty() {
            return Err(JsNativeError::error()
                .with_message("fetch: missing URL")
                .into());
        }

        let remaining = FETCH_DEADLINE
            .with(Cell::get)
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO);
        if remaining.is_zero() {
            return Err(JsNativeError::error()
                .with_message("fetch: execution deadline exhausted")
                .into());
        }

        let (status, body) =
            fetch_sync(&url, remaining).map_err(|msg| JsNativeError::error().with_message(msg))?;

        let ok = (200..300).contains(&status);
        let response = ObjectInitializer::new(ctx)
            .property(js_string!("ok"), JsValue::from(ok), Attribute::all())
            .property(
                js_string!("status"),
                JsValue::from(i32::from(status)),
                Attribute::all(),
            )
            .property(
                js_string!("body"),
                JsValue::from(JsString::from(body.as_str())),
                Attribute::all(),
            )
            .build();
        Ok(JsValue::from(response))
    });

    context
        .register_global_property(
            js_string!("fetch"),
            fetch_fn.to_js_function(context.realm()),
            Attribute::all(),
        )
        .map_err(|e| SandboxError::Environment(format!("cannot register fetch: {e}")))
}

/// Synchronous GET with the remaining deadline as the HTTP timeout.
/// Returns `(status, body)`.
fn fetch_sync(url: &str, budget: Duration) -> Result<(u16, String), String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("scriptgate/0.1")
        .timeout(budget)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| format!("fetch client error: {e}"))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| format!("fetch failed: {e}"))?;

    let status = response.status().as_u16();

    if let Some(declared) = response.content_length() {
        if declared > MAX_FETCH_BODY as u64 {
            return Err(format!(
                "fetch body too large: {declared} bytes (max {MAX_FETCH_BODY})"
            ));
        }
    }

    let bytes = read_capped(&mut response, MAX_FETCH_BODY)?;
    Ok((status, String::from_utf8_lossy(&bytes).to_string()))
}

/// Incremental body read that aborts as soon as the cap is exceeded, so a
/// hostile server cannot make the host buffer an oversized response.
fn read_capped(reader: &mut impl Read, max: usize) -> Result<Vec<u8>, String> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 8 * 1024];
    loop {
        let n = reader
            .read(&mut chunk)
            .map_err(|e| format!("fetch read body: {e}"))?;
        if n == 0 {
            return Ok(body);
        }
        if body.len() + n > max {
            return Err(format!("fetch body too large (max {max} bytes)"));
        }
        body.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn capped_read_accepts_bodies_within_the_limit() {
        let mut source = Cursor::new(vec![7u8; 10_000]);
        let body = read_capped(&mut source, 16 * 1024).unwrap();
        assert_eq!(body.len(), 10_000);
    }

    #[test]
    fn capped_read_aborts_once_the_limit_is_crossed() {
        let mut source = Cursor::new(vec![7u8; MAX_FETCH_BODY + 1]);
        let err = read_capped(&mut source, MAX_FETCH_BODY).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn exhausted_budget_rejects_before_io() {
        // Unroutable without ever being dialed: zero budget fails first.
        let err = fetch_sync("http://192.0.2.1/", Duration::from_nanos(1)).unwrap_err();
        assert!(err.starts_with("fetch"));
    }
}
