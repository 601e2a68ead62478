//! Endpoint handlers
//!
//! Thin glue: validate presence of required fields, dispatch to the sandbox
//! or the extraction walker, serialize the result. Dedup policy is fixed per
//! endpoint and never blended within a response:
//! - `/extract-images` (rich shape) uses full-record dedup
//! - `/extract-image-urls` (legacy split shape) uses URL-only, first-seen

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use scriptgate_extract::{
    dedup, elements_from_value, extract_from_markup, extract_from_tree, split_urls, DedupPolicy,
    ImageNode,
};
use scriptgate_sandbox::{ExecutionOutcome, ExecutionRequest};

use crate::error::ApiError;
use crate::AppState;

/// `GET /health` — bypasses auth and rate limiting, touches neither engine.
pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// `POST /execute` — run caller script inside the isolation boundary.
///
/// JSON body `{script, context?, timeoutMs?}`; a `text/plain` body is the
/// legacy variant and is taken as the bare script.
pub(crate) async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = parse_execution_request(&headers, &body)?;
    if request.script.trim().is_empty() {
        return Err(ApiError::ClientInput(
            "Missing required field: script".to_string(),
        ));
    }

    let outcome = state.sandbox.execute(request).await;
    Ok(render_outcome(outcome, state.config.expose_traces))
}

fn parse_execution_request(
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<ExecutionRequest, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("text/plain") {
        let script = std::str::from_utf8(body)
            .map_err(|_| ApiError::ClientInput("script must be UTF-8 text".to_string()))?;
        return Ok(ExecutionRequest::new(script));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::ClientInput(format!("invalid request body: {e}")))
}

fn render_outcome(outcome: ExecutionOutcome, expose_traces: bool) -> Response {
    match outcome {
        ExecutionOutcome::Success { value } => {
            (StatusCode::OK, Json(json!({ "result": value }))).into_response()
        }
        ExecutionOutcome::Failure { message, trace } => {
            let mut body = json!({ "error": message });
            if expose_traces {
                if let Some(trace) = trace {
                    body["trace"] = Value::String(trace);
                }
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Body accepted by both extraction endpoints. At least one of the two
/// fields must be present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ExtractRequest {
    html_content: Option<String>,
    elements: Option<Value>,
}

/// `POST /extract-images` — rich shape, full-record dedup.
pub(crate) async fn extract_images(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Value>, ApiError> {
    let nodes = collect_nodes(&state, request)?;
    let images = dedup(nodes, DedupPolicy::FullRecord);
    Ok(Json(json!({ "images": images })))
}

/// `POST /extract-image-urls` — legacy split shape, URL-only dedup with the
/// first-seen node winning.
pub(crate) async fn extract_image_urls(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Value>, ApiError> {
    let nodes = collect_nodes(&state, request)?;
    let unique = dedup(nodes, DedupPolicy::UrlFirstSeen);
    let split = split_urls(&unique);
    Ok(Json(json!({ "external": split.external, "inline": split.inline })))
}

/// Run the requested extraction modes and concatenate their results in
/// markup-then-tree order.
fn collect_nodes(state: &AppState, request: ExtractRequest) -> Result<Vec<ImageNode>, ApiError> {
    if request.html_content.is_none() && request.elements.is_none() {
        return Err(ApiError::ClientInput(
            "Missing required field: htmlContent or elements".to_string(),
        ));
    }

    let mut nodes = Vec::new();
    if let Some(html) = &request.html_content {
        nodes.extend(extract_from_markup(html)?);
    }
    if let Some(raw) = request.elements {
        let elements = elements_from_value(raw)?;
        nodes.extend(extract_from_tree(&elements, &state.config.tree_budget)?);
    }
    Ok(nodes)
}
