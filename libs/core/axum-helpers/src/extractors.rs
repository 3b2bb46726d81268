//! Custom extractors with uniform rejection handling.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Json, Request},
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::errors::{error_response, ErrorCode};

/// JSON body extractor that maps rejections onto the standard error envelope.
///
/// A missing or empty body becomes `INVALID_INPUT`; a body that fails to
/// parse or deserialize becomes `INVALID_JSON`. Handlers never see axum's
/// default rejection bodies.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::info!("request body rejected: {}", rejection.body_text());
                let response = match &rejection {
                    JsonRejection::MissingJsonContentType(_) => error_response(
                        ErrorCode::InvalidInput,
                        "Request body must be JSON (missing content-type)",
                    ),
                    JsonRejection::JsonSyntaxError(_) => {
                        error_response(ErrorCode::InvalidJson, "Invalid JSON in request body")
                    }
                    JsonRejection::JsonDataError(e) => {
                        error_response(ErrorCode::InvalidJson, e.body_text())
                    }
                    _ => error_response(ErrorCode::InvalidInput, "Request body is required"),
                };
                Err(response)
            }
        }
    }
}
