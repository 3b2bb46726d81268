use axum::response::Response;

use super::{error_response, ErrorCode};

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    error_response(ErrorCode::NotFound, "The requested resource was not found")
}
