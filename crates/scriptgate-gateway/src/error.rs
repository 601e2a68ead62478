//! Gateway error taxonomy and HTTP mapping
//!
//! Client-input faults stop at the validation gate with 400; auth and rate
//! limiting short-circuit with 401/429 before any engine code runs;
//! engine-side parse and format faults surface as 500. Sandbox failures are
//! not errors here: they arrive as `ExecutionOutcome::Failure` and the
//! execute handler renders them directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use scriptgate_extract::ExtractError;

/// Request-level error, mapped to a JSON `{error}` body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed required input; never reaches the engines
    #[error("{0}")]
    ClientInput(String),

    /// `Authorization` header absent or wrong
    #[error("Unauthorized")]
    Unauthorized,

    /// Source exceeded the sliding-window request cap
    #[error("Too many requests, please try again later.")]
    RateLimited,

    /// Extraction-side fault (parse, format, traversal budget)
    #[error("{0}")]
    Extraction(#[from] ExtractError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::ClientInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            // An empty document is a client-input problem even though it is
            // detected engine-side; parse-time faults stay server errors
            // because the failure happens inside parsing, not at the
            // validation gate.
            Self::Extraction(ExtractError::EmptyDocument) => StatusCode::BAD_REQUEST,
            Self::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            ApiError::ClientInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Extraction(ExtractError::Markup("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn empty_document_is_client_visible_not_a_server_fault() {
        assert_eq!(
            ApiError::Extraction(ExtractError::EmptyDocument).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rate_limit_message_matches_contract() {
        assert_eq!(
            ApiError::RateLimited.to_string(),
            "Too many requests, please try again later."
        );
    }
}
