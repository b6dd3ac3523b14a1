//! API request and response types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stlcost::{CostError, ErrorKind, UsageBreakdown};

/// Fields of an upload form, as received.
#[derive(Debug, Default, Clone)]
pub struct UploadForm {
    /// Raw STL bytes.
    pub file: Option<Vec<u8>>,
    /// Infill density in percent.
    pub infill: Option<String>,
    /// Material preset name or density.
    pub material: Option<String>,
    /// Estimation model name.
    pub model: Option<String>,
    /// Layer height in mm.
    pub layer_height: Option<String>,
}

/// Successful quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Formatted price, e.g. `$0.06`
    pub price: String,
    /// Volume and weight by component
    pub breakdown: UsageBreakdown,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server is up
    pub status: String,
    /// Crate version of the running server
    pub version: String,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
}

/// A failed request: status plus error body.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status to respond with
    pub status: StatusCode,
    /// JSON error body
    pub body: ErrorResponse,
}

impl ApiError {
    /// Error with an explicit status, code and message
    pub fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                code: code.to_string(),
            },
        }
    }

    /// The form had no `file` field
    pub fn no_file() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "no_file", "No file uploaded.")
    }

    /// The uploaded file exceeds `limit` bytes
    pub fn too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "too_large",
            format!("File exceeds the {limit} byte upload limit."),
        )
    }
}

impl From<CostError> for ApiError {
    fn from(err: CostError) -> Self {
        let kind = err.kind();
        let status = match kind {
            ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::Parse => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::InvalidParameter => StatusCode::BAD_REQUEST,
        };
        Self::new(status, kind.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let err = ApiError::no_file();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "no_file");

        let err = ApiError::too_large(100);
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.body.error.contains("100 byte"));
    }

    #[test]
    fn test_from_cost_error() {
        let err = ApiError::from(CostError::Parse("bad".into()));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.code, "parse_error");
    }
}
