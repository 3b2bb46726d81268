//! Single source of truth for client-facing error codes.
//!
//! Each code carries its string identifier, canonical HTTP status, and
//! default message. Handlers map domain errors to codes; nothing below the
//! handler layer chooses an HTTP status.

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Client errors (400)
    ValidationError,
    InvalidInput,
    InvalidJson,

    // Not found (404)
    NotFound,
    ProductNotFound,
    CategoryNotFound,

    // Conflicts (409)
    Conflict,
    DuplicateProduct,
    ProductInUse,

    // Server errors (500)
    InternalError,
    DatabaseError,
}

impl ErrorCode {
    /// Machine-readable identifier for client parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::DuplicateProduct => "DUPLICATE_PRODUCT",
            Self::ProductInUse => "PRODUCT_IN_USE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Canonical HTTP status for this code.
    pub fn status(&self) -> u16 {
        match self {
            Self::ValidationError | Self::InvalidInput | Self::InvalidJson => 400,
            Self::NotFound | Self::ProductNotFound | Self::CategoryNotFound => 404,
            Self::Conflict | Self::DuplicateProduct | Self::ProductInUse => 409,
            Self::InternalError | Self::DatabaseError => 500,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation failed",
            Self::InvalidInput => "Invalid input data",
            Self::InvalidJson => "Invalid JSON in request body",
            Self::NotFound => "Resource not found",
            Self::ProductNotFound => "Product not found",
            Self::CategoryNotFound => "Category not found",
            Self::Conflict => "Resource conflict",
            Self::DuplicateProduct => "Product with this name already exists",
            Self::ProductInUse => "Cannot delete product with active orders",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database operation failed",
        }
    }
}
