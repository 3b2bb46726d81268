//! Catalog domain records and request payloads.
//!
//! Stored documents and wire payloads share the same camelCase field names;
//! `stock_mode` and `onB2C` are historical exceptions kept for compatibility
//! with existing table data.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Where stock and variant pricing authority lives.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StockMode {
    #[default]
    Parent,
    Variant,
}

/// Derived stock status. Never settable by clients; recomputed whenever a
/// stock-affecting field changes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProductStatus {
    OutOfStock,
    LowStock,
    #[default]
    InStock,
}

/// A sellable sub-unit of a product, owned exclusively by its parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub b2c_qty: f64,
    pub b2c_unit: String,
    pub stock: i64,
    pub unit: String,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub compare_price: f64,
    pub status: ProductStatus,
    pub low_stock_alert: i64,
    #[serde(rename = "onB2C")]
    pub on_b2c: bool,
    pub images: Vec<String>,
    pub expiry_date: String,
}

/// The product root aggregate as persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub category_name: String,
    pub sub_category_id: String,
    pub sub_category_name: String,
    pub group_id: String,
    pub base_price: f64,
    pub purchase_price: f64,
    pub compare_price: f64,
    pub stock: i64,
    pub unit: String,
    #[serde(rename = "stock_mode")]
    pub stock_mode: StockMode,
    pub status: ProductStatus,
    pub low_stock_alert: i64,
    pub variants: Vec<Variant>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "onB2C")]
    pub on_b2c: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
    /// Set by the rating pipeline, never by this service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Category reference resolved at product creation time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Variant payload accepted on create and update. All fields optional so the
/// validator can report what is missing instead of the deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub name: Option<String>,
    pub b2c_qty: Option<f64>,
    pub b2c_unit: Option<String>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub compare_price: Option<f64>,
    pub low_stock_alert: Option<i64>,
    #[serde(rename = "onB2C")]
    pub on_b2c: Option<bool>,
    pub images: Option<Vec<String>>,
    pub expiry_date: Option<String>,
}

/// Product-create payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub sub_category_name: Option<String>,
    pub group_id: Option<String>,
    pub base_price: Option<f64>,
    pub purchase_price: Option<f64>,
    pub compare_price: Option<f64>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
    /// Kept as a free string so an invalid value surfaces as a field error.
    #[serde(rename = "stock_mode")]
    pub stock_mode: Option<String>,
    pub low_stock_alert: Option<i64>,
    pub variants: Option<Vec<VariantInput>>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "onB2C")]
    pub on_b2c: Option<bool>,
    pub is_active: Option<bool>,
}

/// Partial-update payload. Absent fields are untouched; `variants` replaces
/// the whole array when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sub_category_id: Option<String>,
    pub sub_category_name: Option<String>,
    pub group_id: Option<String>,
    pub base_price: Option<f64>,
    pub purchase_price: Option<f64>,
    pub compare_price: Option<f64>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
    #[serde(rename = "stock_mode")]
    pub stock_mode: Option<String>,
    pub low_stock_alert: Option<i64>,
    pub variants: Option<Vec<VariantInput>>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "onB2C")]
    pub on_b2c: Option<bool>,
    pub is_active: Option<bool>,
    /// Bumped by one at persist time when the payload carries it.
    pub version: Option<i64>,
}

/// Query parameters for `GET /product`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub last_evaluated_key: Option<String>,
}

/// Query parameters for `GET /product/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<usize>,
}

/// Query parameters for `GET /product/featured`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

/// Query parameters for `DELETE /product/{id}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub hard_delete: Option<bool>,
}
