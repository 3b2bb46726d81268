use crate::{env_or_default, ConfigError, FromEnv};

/// Table (collection) names for the catalog service.
///
/// Defaults match the managed store the service was deployed against; override
/// per environment with `PRODUCTS_TABLE` / `CATEGORY_TABLE_NAME`.
#[derive(Clone, Debug)]
pub struct CatalogTables {
    pub products: String,
    pub categories: String,
}

impl FromEnv for CatalogTables {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            products: env_or_default("PRODUCTS_TABLE", "Products"),
            categories: env_or_default("CATEGORY_TABLE_NAME", "Category_management"),
        })
    }
}

impl Default for CatalogTables {
    fn default() -> Self {
        Self {
            products: "Products".to_string(),
            categories: "Category_management".to_string(),
        }
    }
}
