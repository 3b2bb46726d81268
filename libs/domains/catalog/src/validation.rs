//! Field-by-field payload validation.
//!
//! All violations are collected rather than short-circuited; nested variant
//! errors use bracket-index field paths (`variants[0].b2cQty`) so clients can
//! map them back onto the submitted array.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CreateProduct, FieldError, UpdateProduct, VariantInput};
use crate::units;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-.,&()]+$").expect("valid name regex"));

static INVALID_UNIT_MESSAGE: LazyLock<String> = LazyLock::new(|| {
    let categories: Vec<&str> = units::supported_units()
        .iter()
        .map(|(category, _)| category.name())
        .collect();
    format!("Invalid unit. Supported units: {}", categories.join(", "))
});

/// Validate a full create payload. Empty result means valid.
pub fn validate_product_input(data: &CreateProduct) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match &data.name {
        Some(name) if !name.trim().is_empty() => {
            if let Some(e) = validate_product_name(name) {
                errors.push(e);
            }
        }
        _ => errors.push(FieldError::new(
            "name",
            "Product name is required and must be a non-empty string",
        )),
    }

    if data.category_id.as_deref().is_none_or(str::is_empty) {
        errors.push(FieldError::new("categoryId", "Category ID is required"));
    }

    if let Some(e) = validate_required_price(data.base_price, "basePrice") {
        errors.push(e);
    }

    if let Some(mode) = &data.stock_mode {
        if mode != "parent" && mode != "variant" {
            errors.push(FieldError::new(
                "stock_mode",
                "Stock mode must be either \"parent\" or \"variant\"",
            ));
        }
    }

    if data.stock.is_some_and(|s| s < 0) {
        errors.push(FieldError::new(
            "stock",
            "Stock must be a non-negative integer",
        ));
    }

    if let Some(unit) = &data.unit {
        if !unit.is_empty() && !units::is_valid_unit(unit) {
            errors.push(FieldError::new("unit", INVALID_UNIT_MESSAGE.as_str()));
        }
    }

    if data.low_stock_alert.is_some_and(|a| a < 0) {
        errors.push(FieldError::new(
            "lowStockAlert",
            "Low stock alert must be a non-negative integer",
        ));
    }

    if let Some(description) = &data.description {
        if description.len() > 2000 {
            errors.push(FieldError::new(
                "description",
                "Description must not exceed 2000 characters",
            ));
        }
    }

    if let Some(variants) = &data.variants {
        for (index, variant) in variants.iter().enumerate() {
            errors.extend(validate_variant(variant, index));
        }
    }

    if let Some(images) = &data.images {
        errors.extend(validate_images(images));
    }

    if let Some(tags) = &data.tags {
        errors.extend(validate_tags(tags));
    }

    errors
}

/// Validate a partial-update payload. Absence is never an error; presence of
/// an invalid value is.
pub fn validate_update_data(data: &UpdateProduct) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(name) = &data.name {
        if let Some(e) = validate_product_name(name) {
            errors.push(e);
        }
    }

    if let Some(price) = data.base_price {
        if let Some(e) = validate_required_price(Some(price), "basePrice") {
            errors.push(e);
        }
    }

    if data.stock.is_some_and(|s| s < 0) {
        errors.push(FieldError::new(
            "stock",
            "Stock must be a non-negative integer",
        ));
    }

    if let Some(mode) = &data.stock_mode {
        if mode != "parent" && mode != "variant" {
            errors.push(FieldError::new(
                "stock_mode",
                "Stock mode must be either \"parent\" or \"variant\"",
            ));
        }
    }

    if let Some(unit) = &data.unit {
        if !unit.is_empty() && !units::is_valid_unit(unit) {
            errors.push(FieldError::new("unit", INVALID_UNIT_MESSAGE.as_str()));
        }
    }

    if data.low_stock_alert.is_some_and(|a| a < 0) {
        errors.push(FieldError::new(
            "lowStockAlert",
            "Low stock alert must be a non-negative integer",
        ));
    }

    if let Some(description) = &data.description {
        if description.len() > 2000 {
            errors.push(FieldError::new(
                "description",
                "Description must not exceed 2000 characters",
            ));
        }
    }

    if let Some(variants) = &data.variants {
        for (index, variant) in variants.iter().enumerate() {
            errors.extend(validate_variant(variant, index));
        }
    }

    if let Some(images) = &data.images {
        errors.extend(validate_images(images));
    }

    if let Some(tags) = &data.tags {
        errors.extend(validate_tags(tags));
    }

    errors
}

/// Validate one variant payload; errors are prefixed with `variants[index]`.
pub fn validate_variant(variant: &VariantInput, index: usize) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let prefix = format!("variants[{index}]");

    if variant.name.as_deref().is_none_or(str::is_empty) {
        errors.push(FieldError::new(
            format!("{prefix}.name"),
            "Variant name is required",
        ));
    }

    if variant.b2c_qty.is_none_or(|q| q <= 0.0) {
        errors.push(FieldError::new(
            format!("{prefix}.b2cQty"),
            "B2C quantity is required and must be positive",
        ));
    }

    match variant.b2c_unit.as_deref() {
        None | Some("") => errors.push(FieldError::new(
            format!("{prefix}.b2cUnit"),
            "B2C unit is required",
        )),
        Some(unit) if !units::is_valid_unit(unit) => errors.push(FieldError::new(
            format!("{prefix}.b2cUnit"),
            "Invalid B2C unit",
        )),
        Some(_) => {}
    }

    if variant.sale_price.is_some_and(|p| p < 0.0) {
        errors.push(FieldError::new(
            format!("{prefix}.salePrice"),
            "Price cannot be negative",
        ));
    }

    if variant.purchase_price.is_some_and(|p| p < 0.0) {
        errors.push(FieldError::new(
            format!("{prefix}.purchasePrice"),
            "Price cannot be negative",
        ));
    }

    if variant.stock.is_some_and(|s| s < 0) {
        errors.push(FieldError::new(
            format!("{prefix}.stock"),
            "Stock must be a non-negative integer",
        ));
    }

    errors
}

/// Length and character-set check for product names.
pub fn validate_product_name(name: &str) -> Option<FieldError> {
    if name.len() < 2 || name.len() > 255 {
        return Some(FieldError::new(
            "name",
            "Product name must be between 2 and 255 characters",
        ));
    }
    if !NAME_RE.is_match(name) {
        return Some(FieldError::new(
            "name",
            "Product name contains invalid characters",
        ));
    }
    None
}

fn validate_required_price(price: Option<f64>, field: &str) -> Option<FieldError> {
    match price {
        None => Some(FieldError::new(field, "Price is required")),
        Some(p) if !p.is_finite() => Some(FieldError::new(field, "Price must be a valid number")),
        Some(p) if p < 0.0 => Some(FieldError::new(field, "Price cannot be negative")),
        Some(_) => None,
    }
}

fn validate_images(images: &[String]) -> Vec<FieldError> {
    images
        .iter()
        .enumerate()
        .filter(|(_, image)| !is_valid_url(image))
        .map(|(index, _)| FieldError::new(format!("images[{index}]"), "Each image must be a valid URL"))
        .collect()
}

fn validate_tags(tags: &[String]) -> Vec<FieldError> {
    tags.iter()
        .enumerate()
        .filter(|(_, tag)| tag.trim().is_empty())
        .map(|(index, _)| {
            FieldError::new(format!("tags[{index}]"), "Each tag must be a non-empty string")
        })
        .collect()
}

/// Absolute URL check: must parse and carry both a scheme and a host.
fn is_valid_url(url: &str) -> bool {
    url.parse::<http::Uri>()
        .map(|uri| uri.scheme().is_some() && uri.authority().is_some())
        .unwrap_or(false)
}
