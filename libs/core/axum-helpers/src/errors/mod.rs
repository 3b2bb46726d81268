pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
///
/// ```json
/// {
///   "status": "error",
///   "code": "PRODUCT_NOT_FOUND",
///   "message": "Product not found",
///   "timestamp": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// Validation failures additionally carry `errors`, a list of
/// `{field, message}` entries; other errors may carry free-form `details`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            code: code.as_str(),
            message: message.into(),
            errors: None,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Build the full error response for a code, with its canonical HTTP status.
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    let status = StatusCode::from_u16(code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::new(code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_without_empty_fields() {
        let body = ErrorBody::new(ErrorCode::ProductNotFound, "Product not found");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "PRODUCT_NOT_FOUND");
        assert!(json.get("errors").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn validation_errors_are_attached() {
        let body = ErrorBody::new(ErrorCode::ValidationError, "Validation failed")
            .with_errors(serde_json::json!([{"field": "name", "message": "required"}]));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errors"][0]["field"], "name");
    }
}
