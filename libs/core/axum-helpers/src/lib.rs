//! Shared HTTP plumbing for the catalog APIs.
//!
//! Provides the standard success/error envelopes, the error-code table, a
//! JSON extractor with uniform rejection handling, and server bootstrap with
//! graceful shutdown.

pub mod errors;
pub mod extractors;
pub mod response;
pub mod server;

pub use errors::{error_response, ErrorBody, ErrorCode};
pub use extractors::ApiJson;
pub use response::{ApiMeta, ApiResponse, PaginatedResponse, Pagination};
