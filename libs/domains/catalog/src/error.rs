//! Typed domain errors and their HTTP mapping.
//!
//! Only this layer chooses an HTTP status; services and queries raise the
//! typed variants and store errors are never leaked to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_helpers::errors::{ErrorBody, ErrorCode};
use database::StoreError;
use thiserror::Error;

use crate::models::FieldError;

pub type ProductResult<T> = Result<T, ProductError>;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product with this name already exists: {0}")]
    DuplicateProduct(String),

    #[error("Cannot delete product with active orders: {0}")]
    ProductInUse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProductError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            Self::ProductNotFound(_) => ErrorCode::ProductNotFound,
            Self::DuplicateProduct(_) => ErrorCode::DuplicateProduct,
            Self::ProductInUse(_) => ErrorCode::ProductInUse,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Store(_) => ErrorCode::DatabaseError,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self {
            Self::Validation(errors) => {
                tracing::info!(count = errors.len(), "request failed validation");
                ErrorBody::new(code, code.default_message()).with_errors(
                    serde_json::to_value(errors).unwrap_or(serde_json::Value::Null),
                )
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                ErrorBody::new(code, code.default_message())
            }
            Self::InvalidInput(message) => {
                tracing::info!(%message, "invalid input");
                ErrorBody::new(code, message.clone())
            }
            other => {
                tracing::info!(error = %other, "request rejected");
                ErrorBody::new(code, code.default_message())
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_and_statuses() {
        assert_eq!(
            ProductError::Validation(vec![]).code().as_str(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ProductError::ProductNotFound("prod_1".to_string())
                .code()
                .status(),
            404
        );
        assert_eq!(
            ProductError::CategoryNotFound("cat_1".to_string())
                .code()
                .status(),
            404
        );
        assert_eq!(
            ProductError::ProductInUse("prod_1".to_string())
                .code()
                .status(),
            409
        );
        assert_eq!(
            ProductError::Store(StoreError::other("boom")).code().status(),
            500
        );
    }

    #[test]
    fn store_errors_convert_transparently() {
        fn fails() -> ProductResult<()> {
            Err(StoreError::other("connection reset"))?
        }
        assert!(matches!(fails(), Err(ProductError::Store(_))));
    }
}
