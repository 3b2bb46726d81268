//! Standard success envelopes.
//!
//! Every successful response carries `status`, `data`, `message`, and a
//! `meta` block with the timestamp and a per-response request id.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Response metadata attached to every envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMeta {
    pub timestamp: String,
    #[serde(rename = "requestId")]
    pub request_id: String,
}

impl ApiMeta {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            request_id: request_id(),
        }
    }
}

impl Default for ApiMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a request id of the form `req_<epochms>_<hex>`.
pub fn request_id() -> String {
    format!("req_{}_{:08x}", Utc::now().timestamp_millis(), rand::random::<u32>())
}

/// Success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
    pub message: String,
    pub meta: ApiMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            data,
            message: message.into(),
            meta: ApiMeta::new(),
        }
    }

    /// 200 OK response.
    pub fn success(data: T, message: impl Into<String>) -> axum::response::Response {
        (StatusCode::OK, Json(Self::new(data, message))).into_response()
    }

    /// 201 Created response.
    pub fn created(data: T, message: impl Into<String>) -> axum::response::Response {
        (StatusCode::CREATED, Json(Self::new(data, message))).into_response()
    }
}

/// 204 No Content response.
pub fn no_content() -> axum::response::Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Pagination block for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "hasPrevPage")]
    pub has_prev_page: bool,
    #[serde(rename = "lastEvaluatedKey", skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<String>,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let pages = total.div_ceil(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages,
            has_next_page: page < pages,
            has_prev_page: page > 1,
            last_evaluated_key: None,
        }
    }

    pub fn with_cursor(mut self, key: Option<String>) -> Self {
        self.last_evaluated_key = key;
        self
    }
}

/// Paginated success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub status: &'static str,
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub message: String,
    pub meta: ApiMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            data,
            pagination,
            message: message.into(),
            meta: ApiMeta::new(),
        }
    }

    pub fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_format() {
        let id = request_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts[0], "req");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn envelope_shape() {
        let envelope = ApiResponse::new(serde_json::json!({"id": "p1"}), "ok");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["id"], "p1");
        assert!(json["meta"]["requestId"].as_str().unwrap().starts_with("req_"));
    }

    #[test]
    fn pagination_math() {
        let p = Pagination::new(2, 20, 45);
        assert_eq!(p.pages, 3);
        assert!(p.has_next_page);
        assert!(p.has_prev_page);

        let last = Pagination::new(3, 20, 45);
        assert!(!last.has_next_page);
    }

    #[test]
    fn pagination_empty_total() {
        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }
}
