//! Product orchestration: validation, category checks, id generation,
//! status computation, and variant price derivation.

use std::sync::Arc;

use chrono::Utc;
use core_config::tables::CatalogTables;
use database::DocumentStore;
use serde_json::{Map, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Product, ProductStatus, StockMode, UpdateProduct, Variant, VariantInput,
};
use crate::queries::{
    CategoryPage, CategoryQueries, ListOptions, ProductQueries, ScanPage, SearchFilters,
};
use crate::units;
use crate::validation;

/// Single source of truth for stock status. Product and each variant apply
/// it independently with their own stock/threshold pair.
pub fn calculate_product_status(stock: i64, low_stock_alert: i64) -> ProductStatus {
    if stock == 0 {
        ProductStatus::OutOfStock
    } else if low_stock_alert > 0 && stock <= low_stock_alert {
        ProductStatus::LowStock
    } else {
        ProductStatus::InStock
    }
}

fn generate_product_id() -> String {
    format!("prod_{}", Uuid::new_v4())
}

fn generate_variant_id(product_id: &str, index: usize) -> String {
    let suffix = product_id.strip_prefix("prod_").unwrap_or(product_id);
    format!("var_{suffix}_{index}")
}

/// Parent-side inputs consulted when building a variant. On update this is
/// populated from the update payload, not the stored record.
struct ParentContext {
    name: String,
    unit: String,
    base_price: f64,
    purchase_price: f64,
}

pub struct ProductService<S> {
    products: ProductQueries<S>,
    categories: CategoryQueries<S>,
}

impl<S: DocumentStore> ProductService<S> {
    pub fn new(store: Arc<S>, tables: CatalogTables) -> Self {
        Self {
            products: ProductQueries::new(Arc::clone(&store), tables.clone()),
            categories: CategoryQueries::new(store, tables),
        }
    }

    #[instrument(skip(self, data), fields(name = data.name.as_deref().unwrap_or("")))]
    pub async fn create_product(&self, data: CreateProduct) -> ProductResult<Product> {
        let errors = validation::validate_product_input(&data);
        if !errors.is_empty() {
            return Err(ProductError::Validation(errors));
        }

        let category_id = data.category_id.clone().unwrap_or_default();
        let category = self
            .categories
            .get_category_by_id(&category_id)
            .await?
            .ok_or_else(|| ProductError::CategoryNotFound(category_id.clone()))?;

        let product_id = generate_product_id();
        let stock_mode = parse_stock_mode(data.stock_mode.as_deref());

        let parent = ParentContext {
            name: data.name.clone().unwrap_or_default(),
            unit: data.unit.clone().filter(|u| !u.is_empty()).unwrap_or_else(|| "kg".to_string()),
            base_price: data.base_price.unwrap_or(0.0),
            purchase_price: data.purchase_price.unwrap_or(0.0),
        };

        let variants: Vec<Variant> = data
            .variants
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, input)| build_variant(input, &product_id, index, stock_mode, &parent))
            .collect();

        let stock = data.stock.unwrap_or(0);
        let low_stock_alert = data.low_stock_alert.unwrap_or(0);
        let now = Utc::now().to_rfc3339();

        let product = Product {
            id: product_id.clone(),
            name: parent.name.clone(),
            description: data.description.unwrap_or_default(),
            category_id,
            category_name: category.name,
            sub_category_id: data.sub_category_id.unwrap_or_default(),
            sub_category_name: data.sub_category_name.unwrap_or_default(),
            group_id: data.group_id.unwrap_or_default(),
            base_price: parent.base_price,
            purchase_price: parent.purchase_price,
            compare_price: data.compare_price.unwrap_or(0.0),
            stock,
            unit: parent.unit.clone(),
            stock_mode,
            status: calculate_product_status(stock, low_stock_alert),
            low_stock_alert,
            variants,
            images: data.images.unwrap_or_default(),
            tags: data.tags.unwrap_or_default(),
            on_b2c: data.on_b2c != Some(false),
            is_active: data.is_active != Some(false),
            is_deleted: false,
            deleted_at: None,
            created_at: now.clone(),
            updated_at: now,
            version: 1,
            rating: None,
        };

        self.products.save_product(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self, updates))]
    pub async fn update_product(
        &self,
        product_id: &str,
        updates: UpdateProduct,
    ) -> ProductResult<Product> {
        let errors = validation::validate_update_data(&updates);
        if !errors.is_empty() {
            return Err(ProductError::Validation(errors));
        }

        let existing = self.get_product_by_id(product_id).await?;

        let mut fields = update_fields(&updates);

        if let Some(stock) = updates.stock {
            let threshold = updates.low_stock_alert.unwrap_or(existing.low_stock_alert);
            let status = calculate_product_status(stock, threshold);
            fields.insert("status".to_string(), Value::String(status.to_string()));
        }

        if let Some(variant_inputs) = &updates.variants {
            // Parent pricing comes from the update payload; stock_mode cannot
            // change through this path.
            let parent = ParentContext {
                name: updates.name.clone().unwrap_or_else(|| existing.name.clone()),
                unit: updates
                    .unit
                    .clone()
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| "kg".to_string()),
                base_price: updates.base_price.unwrap_or(0.0),
                purchase_price: updates.purchase_price.unwrap_or(0.0),
            };
            let variants: Vec<Variant> = variant_inputs
                .iter()
                .enumerate()
                .map(|(index, input)| {
                    build_variant(input, product_id, index, existing.stock_mode, &parent)
                })
                .collect();
            fields.insert(
                "variants".to_string(),
                serde_json::to_value(variants).unwrap_or(Value::Null),
            );
        }

        let updated = self.products.update_product(product_id, fields).await?;
        tracing::info!(%product_id, "product updated");
        Ok(updated)
    }

    /// Soft delete by default; hard delete physically removes the row.
    /// A second delete of the same product reports not-found.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: &str, soft_delete: bool) -> ProductResult<()> {
        self.get_product_by_id(product_id).await?;

        if soft_delete {
            self.products.soft_delete_product(product_id).await?;
        } else {
            self.products.delete_product(product_id).await?;
        }
        tracing::info!(%product_id, soft_delete, "product deleted");
        Ok(())
    }

    /// Soft-deleted products read as not-found.
    pub async fn get_product_by_id(&self, product_id: &str) -> ProductResult<Product> {
        match self.products.get_product_by_id(product_id).await? {
            Some(product) if !product.is_deleted => Ok(product),
            _ => Err(ProductError::ProductNotFound(product_id.to_string())),
        }
    }

    pub async fn get_products_by_category(
        &self,
        category_id: &str,
        page: usize,
        limit: usize,
    ) -> ProductResult<CategoryPage> {
        Ok(self
            .products
            .query_products_by_category(category_id, page, limit)
            .await?)
    }

    pub async fn search_products(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> ProductResult<Vec<Product>> {
        let items = self.products.search_products(query, filters).await?;
        Ok(items.into_iter().filter(|p| !p.is_deleted).collect())
    }

    /// Full listing page. The underlying scan does not exclude deleted
    /// records, so they are dropped here; counts stay approximate.
    pub async fn get_all_products(&self, options: &ListOptions) -> ProductResult<ScanPage> {
        let mut page = self.products.get_all_products(options).await?;
        page.items.retain(|p| !p.is_deleted);
        Ok(page)
    }

    pub async fn get_featured_products(&self, limit: usize) -> ProductResult<Vec<Product>> {
        let items = self.products.get_featured_products(limit).await?;
        Ok(items.into_iter().filter(|p| !p.is_deleted).collect())
    }

    pub async fn get_low_stock_products(&self) -> ProductResult<Vec<Product>> {
        let items = self.products.get_products_with_low_stock().await?;
        Ok(items.into_iter().filter(|p| !p.is_deleted).collect())
    }

    pub async fn get_products_by_group(&self, group_id: &str) -> ProductResult<Vec<Product>> {
        let items = self.products.get_products_by_group_id(group_id).await?;
        Ok(items.into_iter().filter(|p| !p.is_deleted).collect())
    }
}

fn parse_stock_mode(mode: Option<&str>) -> StockMode {
    mode.and_then(|m| m.parse().ok()).unwrap_or_default()
}

/// Build one variant. In parent mode with a non-zero parent base price,
/// sale/purchase prices are derived by scaling the parent prices with the
/// quantity converted into the parent unit; otherwise submitted prices stand.
fn build_variant(
    input: &VariantInput,
    product_id: &str,
    index: usize,
    stock_mode: StockMode,
    parent: &ParentContext,
) -> Variant {
    let mut sale_price = input.sale_price.unwrap_or(0.0);
    let mut purchase_price = input.purchase_price.unwrap_or(0.0);

    if stock_mode == StockMode::Parent && parent.base_price > 0.0 {
        let qty_in_parent_unit = units::convert(
            input.b2c_qty.unwrap_or(0.0),
            input.b2c_unit.as_deref().filter(|u| !u.is_empty()).unwrap_or("kg"),
            &parent.unit,
        );
        sale_price = parent.base_price * qty_in_parent_unit;
        purchase_price = parent.purchase_price * qty_in_parent_unit;
    }

    let stock = input.stock.unwrap_or(0);

    Variant {
        id: generate_variant_id(product_id, index),
        name: input.name.clone().unwrap_or_else(|| parent.name.clone()),
        b2c_qty: input.b2c_qty.unwrap_or(0.0),
        b2c_unit: input
            .b2c_unit
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "kg".to_string()),
        stock: if stock_mode == StockMode::Variant { stock } else { 0 },
        unit: input.unit.clone().unwrap_or_default(),
        purchase_price,
        sale_price,
        compare_price: input.compare_price.unwrap_or(0.0),
        status: calculate_product_status(stock, input.low_stock_alert.unwrap_or(0)),
        low_stock_alert: input.low_stock_alert.unwrap_or(0),
        on_b2c: input.on_b2c != Some(false),
        images: input.images.clone().unwrap_or_default(),
        expiry_date: input.expiry_date.clone().unwrap_or_default(),
    }
}

/// Serialize the present update fields into store assignments, wire names
/// included. `variants` and `status` are handled by the caller.
fn update_fields(updates: &UpdateProduct) -> Map<String, Value> {
    let mut fields = Map::new();

    if let Some(v) = &updates.name {
        fields.insert("name".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = &updates.description {
        fields.insert("description".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = &updates.sub_category_id {
        fields.insert("subCategoryId".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = &updates.sub_category_name {
        fields.insert("subCategoryName".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = &updates.group_id {
        fields.insert("groupId".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = updates.base_price {
        fields.insert("basePrice".to_string(), Value::from(v));
    }
    if let Some(v) = updates.purchase_price {
        fields.insert("purchasePrice".to_string(), Value::from(v));
    }
    if let Some(v) = updates.compare_price {
        fields.insert("comparePrice".to_string(), Value::from(v));
    }
    if let Some(v) = updates.stock {
        fields.insert("stock".to_string(), Value::from(v));
    }
    if let Some(v) = &updates.unit {
        fields.insert("unit".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = &updates.stock_mode {
        fields.insert("stock_mode".to_string(), Value::String(v.clone()));
    }
    if let Some(v) = updates.low_stock_alert {
        fields.insert("lowStockAlert".to_string(), Value::from(v));
    }
    if let Some(v) = &updates.images {
        fields.insert(
            "images".to_string(),
            serde_json::to_value(v).unwrap_or(Value::Null),
        );
    }
    if let Some(v) = &updates.tags {
        fields.insert(
            "tags".to_string(),
            serde_json::to_value(v).unwrap_or(Value::Null),
        );
    }
    if let Some(v) = updates.on_b2c {
        fields.insert("onB2C".to_string(), Value::Bool(v));
    }
    if let Some(v) = updates.is_active {
        fields.insert("isActive".to_string(), Value::Bool(v));
    }
    if let Some(v) = updates.version {
        fields.insert("version".to_string(), Value::from(v));
    }

    fields
}
