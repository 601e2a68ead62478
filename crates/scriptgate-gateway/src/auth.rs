//! Token gate
//!
//! Every state-changing endpoint requires an `Authorization` header equal to
//! the configured secret. A mismatch short-circuits before any engine code
//! runs.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::AppState;

pub(crate) async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.config.secure_token.as_str()) {
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}
