//! Table-scoped query builders over the document store.
//!
//! This layer is persistence-shaped only: it knows table names, field names,
//! and cursors, but nothing about validation or status rules. Soft-deleted
//! records are filtered by the service where a read does not filter them
//! here.

use std::sync::Arc;

use chrono::Utc;
use core_config::tables::CatalogTables;
use database::{Condition, Document, DocumentStore, ReadParams, StoreError};
use serde_json::{Map, Value};

use crate::models::{Category, Product};

/// One page of a category-scoped read.
#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub items: Vec<Product>,
    pub count: usize,
    pub page: usize,
    pub limit: usize,
    pub last_evaluated_key: Option<String>,
}

/// One page of a full-table read.
#[derive(Debug, Clone)]
pub struct ScanPage {
    pub items: Vec<Product>,
    pub count: usize,
    pub scanned_count: usize,
    pub last_evaluated_key: Option<String>,
}

/// Filters for the full listing scan.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: usize,
    pub ascending: bool,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub last_evaluated_key: Option<String>,
}

/// Filters for name-prefix search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: usize,
}

pub struct ProductQueries<S> {
    store: Arc<S>,
    tables: CatalogTables,
}

impl<S> Clone for ProductQueries<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tables: self.tables.clone(),
        }
    }
}

impl<S: DocumentStore> ProductQueries<S> {
    pub fn new(store: Arc<S>, tables: CatalogTables) -> Self {
        Self { store, tables }
    }

    pub async fn save_product(&self, product: &Product) -> Result<(), StoreError> {
        let doc = serde_json::to_value(product)
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        self.store.put(&self.tables.products, doc).await
    }

    pub async fn get_product_by_id(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        let doc = self.store.get(&self.tables.products, product_id).await?;
        Ok(doc.and_then(to_product))
    }

    /// Partial update. Stamps `updatedAt`; when the payload itself carries a
    /// `version`, that value is incremented, otherwise the stored version is
    /// left untouched.
    pub async fn update_product(
        &self,
        product_id: &str,
        mut fields: Map<String, Value>,
    ) -> Result<Product, StoreError> {
        fields.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        if let Some(version) = fields.get("version").and_then(Value::as_i64) {
            fields.insert("version".to_string(), Value::from(version + 1));
        }

        let merged = self
            .store
            .update(&self.tables.products, product_id, fields)
            .await?;
        to_product(merged)
            .ok_or_else(|| StoreError::serialization("stored product document is malformed"))
    }

    pub async fn soft_delete_product(&self, product_id: &str) -> Result<Product, StoreError> {
        let mut fields = Map::new();
        fields.insert("isDeleted".to_string(), Value::Bool(true));
        fields.insert(
            "deletedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.update_product(product_id, fields).await
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<(), StoreError> {
        self.store.delete(&self.tables.products, product_id).await
    }

    /// Category-indexed page. Pages beyond the first are approximated by an
    /// oversized read and an offset skip; single-page reads are exact.
    pub async fn query_products_by_category(
        &self,
        category_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<CategoryPage, StoreError> {
        let page = page.max(1);
        let fetch = page.saturating_mul(limit);

        let output = self
            .store
            .query(
                &self.tables.products,
                Condition::eq("categoryId", category_id),
                ReadParams::default()
                    .with_filter(Condition::eq("isDeleted", false))
                    .with_limit(fetch)
                    .descending(),
            )
            .await?;

        let items: Vec<Product> = to_products(output.items)
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(CategoryPage {
            count: items.len(),
            items,
            page,
            limit,
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    /// Name-prefix search with optional category and price-range filters.
    pub async fn search_products(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Product>, StoreError> {
        let mut params = ReadParams::default().with_limit(filters.limit);
        if let Some(category) = &filters.category {
            params = params.with_filter(Condition::eq("categoryId", category.clone()));
        }
        if let Some(min_price) = filters.min_price {
            params = params.with_filter(Condition::ge("basePrice", min_price));
        }
        if let Some(max_price) = filters.max_price {
            params = params.with_filter(Condition::le("basePrice", max_price));
        }

        let output = self
            .store
            .query(
                &self.tables.products,
                Condition::begins_with("name", query),
                params,
            )
            .await?;
        Ok(to_products(output.items))
    }

    /// Full-table page with cursor pagination. Deleted records are not
    /// filtered here.
    pub async fn get_all_products(&self, options: &ListOptions) -> Result<ScanPage, StoreError> {
        let mut params = ReadParams::default()
            .with_limit(options.limit)
            .with_start_key(options.last_evaluated_key.clone());
        if !options.ascending {
            params = params.descending();
        }
        if let Some(category) = &options.category {
            params = params.with_filter(Condition::eq("categoryId", category.clone()));
        }
        if let Some(status) = &options.status {
            params = params.with_filter(Condition::eq("status", status.clone()));
        }
        if let Some(min_price) = options.min_price {
            params = params.with_filter(Condition::ge("basePrice", min_price));
        }
        if let Some(max_price) = options.max_price {
            params = params.with_filter(Condition::le("basePrice", max_price));
        }

        let output = self.store.scan(&self.tables.products, params).await?;
        Ok(ScanPage {
            items: to_products(output.items),
            count: output.count,
            scanned_count: output.scanned_count,
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    /// Products whose stock has fallen to or below their alert threshold.
    pub async fn get_products_with_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        let output = self
            .store
            .scan(
                &self.tables.products,
                ReadParams::default()
                    .with_filter(Condition::gt("lowStockAlert", 0))
                    .with_filter(Condition::le_field("stock", "lowStockAlert")),
            )
            .await?;
        Ok(to_products(output.items))
    }

    pub async fn get_products_by_group_id(
        &self,
        group_id: &str,
    ) -> Result<Vec<Product>, StoreError> {
        let output = self
            .store
            .query(
                &self.tables.products,
                Condition::eq("groupId", group_id),
                ReadParams::default(),
            )
            .await?;
        Ok(to_products(output.items))
    }

    /// Storefront picks: active B2C products that have been rated.
    pub async fn get_featured_products(&self, limit: usize) -> Result<Vec<Product>, StoreError> {
        let output = self
            .store
            .scan(
                &self.tables.products,
                ReadParams::default()
                    .with_filter(Condition::eq("onB2C", true))
                    .with_filter(Condition::eq("isActive", true))
                    .with_filter(Condition::exists("rating"))
                    .with_limit(limit)
                    .descending(),
            )
            .await?;
        Ok(to_products(output.items))
    }

    pub async fn batch_get_products(&self, ids: &[String]) -> Result<Vec<Product>, StoreError> {
        let docs = self.store.batch_get(&self.tables.products, ids).await?;
        Ok(to_products(docs))
    }

    pub async fn count_products_by_category(&self, category_id: &str) -> Result<usize, StoreError> {
        let output = self
            .store
            .query(
                &self.tables.products,
                Condition::eq("categoryId", category_id),
                ReadParams::default(),
            )
            .await?;
        Ok(output.count)
    }

    pub async fn product_exists(&self, product_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(&self.tables.products, product_id)
            .await?
            .is_some())
    }
}

pub struct CategoryQueries<S> {
    store: Arc<S>,
    tables: CatalogTables,
}

impl<S> Clone for CategoryQueries<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tables: self.tables.clone(),
        }
    }
}

impl<S: DocumentStore> CategoryQueries<S> {
    pub fn new(store: Arc<S>, tables: CatalogTables) -> Self {
        Self { store, tables }
    }

    pub async fn get_category_by_id(
        &self,
        category_id: &str,
    ) -> Result<Option<Category>, StoreError> {
        let doc = self.store.get(&self.tables.categories, category_id).await?;
        Ok(doc.and_then(|d| serde_json::from_value(d).ok()))
    }
}

fn to_product(doc: Document) -> Option<Product> {
    match serde_json::from_value::<Product>(doc) {
        Ok(product) => Some(product),
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed product document");
            None
        }
    }
}

fn to_products(docs: Vec<Document>) -> Vec<Product> {
    docs.into_iter().filter_map(to_product).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryStore;
    use serde_json::json;

    fn queries() -> ProductQueries<InMemoryStore> {
        ProductQueries::new(Arc::new(InMemoryStore::new()), CatalogTables::default())
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category_id: "cat_1".to_string(),
            base_price: 50.0,
            stock: 10,
            version: 1,
            ..Product::default()
        }
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let q = queries();
        q.save_product(&product("prod_1", "Rice")).await.unwrap();

        let loaded = q.get_product_by_id("prod_1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Rice");
        assert!(q.get_product_by_id("prod_9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_stamps_updated_at_without_touching_version() {
        let q = queries();
        q.save_product(&product("prod_1", "Rice")).await.unwrap();

        let mut fields = Map::new();
        fields.insert("stock".to_string(), json!(3));
        let updated = q.update_product("prod_1", fields).await.unwrap();

        assert_eq!(updated.stock, 3);
        assert_eq!(updated.version, 1);
        assert!(!updated.updated_at.is_empty());
    }

    #[tokio::test]
    async fn update_increments_version_only_when_supplied() {
        let q = queries();
        q.save_product(&product("prod_1", "Rice")).await.unwrap();

        let mut fields = Map::new();
        fields.insert("version".to_string(), json!(1));
        let updated = q.update_product("prod_1", fields).await.unwrap();
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn soft_delete_marks_record() {
        let q = queries();
        q.save_product(&product("prod_1", "Rice")).await.unwrap();

        let deleted = q.soft_delete_product("prod_1").await.unwrap();
        assert!(deleted.is_deleted);
        assert!(deleted.deleted_at.is_some());
        assert!(q.get_product_by_id("prod_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn category_query_filters_deleted_records() {
        let q = queries();
        q.save_product(&product("prod_1", "Rice")).await.unwrap();
        let mut gone = product("prod_2", "Old Rice");
        gone.is_deleted = true;
        q.save_product(&gone).await.unwrap();

        let page = q.query_products_by_category("cat_1", 1, 20).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].id, "prod_1");
    }

    #[tokio::test]
    async fn search_applies_price_range() {
        let q = queries();
        q.save_product(&product("prod_1", "Organic Tomatoes"))
            .await
            .unwrap();
        let mut pricey = product("prod_2", "Organic Honey");
        pricey.base_price = 400.0;
        q.save_product(&pricey).await.unwrap();

        let filters = SearchFilters {
            max_price: Some(100.0),
            limit: 50,
            ..SearchFilters::default()
        };
        let found = q.search_products("Organic", &filters).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "prod_1");
    }

    #[tokio::test]
    async fn low_stock_scan_matches_threshold_rule() {
        let q = queries();
        let mut low = product("prod_1", "Rice");
        low.stock = 3;
        low.low_stock_alert = 5;
        q.save_product(&low).await.unwrap();

        let mut fine = product("prod_2", "Wheat");
        fine.stock = 50;
        fine.low_stock_alert = 5;
        q.save_product(&fine).await.unwrap();

        let mut no_alert = product("prod_3", "Salt");
        no_alert.stock = 0;
        no_alert.low_stock_alert = 0;
        q.save_product(&no_alert).await.unwrap();

        let found = q.get_products_with_low_stock().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "prod_1");
    }

    #[tokio::test]
    async fn group_count_and_batch_helpers() {
        let q = queries();
        let mut grouped = product("prod_1", "Rice 1kg");
        grouped.group_id = "grp_rice".to_string();
        q.save_product(&grouped).await.unwrap();
        q.save_product(&product("prod_2", "Wheat")).await.unwrap();

        let in_group = q.get_products_by_group_id("grp_rice").await.unwrap();
        assert_eq!(in_group.len(), 1);
        assert_eq!(in_group[0].id, "prod_1");

        assert_eq!(q.count_products_by_category("cat_1").await.unwrap(), 2);
        assert!(q.product_exists("prod_2").await.unwrap());
        assert!(!q.product_exists("prod_9").await.unwrap());

        let batch = q
            .batch_get_products(&["prod_1".to_string(), "prod_9".to_string()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn featured_requires_rating() {
        let q = queries();
        let mut rated = product("prod_1", "Rice");
        rated.on_b2c = true;
        rated.is_active = true;
        rated.rating = Some(4.5);
        q.save_product(&rated).await.unwrap();

        let mut unrated = product("prod_2", "Wheat");
        unrated.on_b2c = true;
        unrated.is_active = true;
        q.save_product(&unrated).await.unwrap();

        let found = q.get_featured_products(20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "prod_1");
    }
}
