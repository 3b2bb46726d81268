//! Product catalog domain: models, validation, unit conversion, persistence
//! queries, orchestration, and the HTTP surface.

pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod service;
pub mod units;
pub mod validation;

pub use error::{ProductError, ProductResult};
pub use models::{
    Category, CreateProduct, FieldError, Product, ProductStatus, StockMode, UpdateProduct, Variant,
    VariantInput,
};
pub use queries::{CategoryQueries, ListOptions, ProductQueries, SearchFilters};
pub use service::{calculate_product_status, ProductService};
