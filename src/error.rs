//! Error taxonomy and HTTP response mapping.
//!
//! Every fallible core operation returns [`CoreError`]. The variants map
//! one-to-one onto the HTTP statuses the API surfaces:
//!
//! | variant | status | meaning |
//! |---------|--------|---------|
//! | `Validation` | 400 | malformed or missing input, rejected before any store access |
//! | `NotFound` | 404 | well-formed request, no matching resource |
//! | `Store` | 500 | the backing store errored; message surfaced verbatim |
//! | `Internal` | 500 | uncaught failure (malformed payload, unexpected error) |
//!
//! A "row not found" result from a lookup is never an error here — lookups
//! use `fetch_optional` and the `None` branch drives control flow.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result alias for core workflow operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing required input. No store access was attempted.
    #[error("{0}")]
    Validation(String),

    /// A well-formed request found no matching resource.
    #[error("{0}")]
    NotFound(String),

    /// The backing store returned an error other than "row not found" on a
    /// lookup, or any error on a write.
    #[error("{0}")]
    Store(#[from] sqlx::Error),

    /// Uncaught failure during request handling.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Store(_) | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            CoreError::Internal(detail) => serde_json::json!({
                "error": "Internal server error",
                "details": detail,
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_error_body() {
        let err = CoreError::Validation("Missing sha256_id parameter".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing sha256_id parameter");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let err = CoreError::NotFound("No valid or untested numbers available".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No valid or untested numbers available");
    }

    #[tokio::test]
    async fn internal_carries_generic_message_plus_detail() {
        let err = CoreError::Internal("unexpected EOF while parsing".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["details"], "unexpected EOF while parsing");
    }

    #[tokio::test]
    async fn store_error_surfaces_message_verbatim() {
        let err = CoreError::Store(sqlx::Error::PoolClosed);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], sqlx::Error::PoolClosed.to_string());
    }
}
