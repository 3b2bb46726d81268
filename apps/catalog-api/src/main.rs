//! Catalog API - product catalog REST server

use std::sync::Arc;

use axum::Router;
use axum_helpers::server::{create_app, with_common_layers};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::{InMemoryStore, RetryingStore};
use domain_catalog::{handlers, ProductService};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        products_table = %config.tables.products,
        categories_table = %config.tables.categories,
        "starting catalog api"
    );

    // Single store handle for the process lifetime; every operation goes
    // through the retry wrapper.
    let store = Arc::new(RetryingStore::new(InMemoryStore::new()));
    let service = ProductService::new(store, config.tables.clone());

    let router = Router::new()
        .nest("/product", handlers::router(service))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    create_app(with_common_layers(router), &config.server).await?;
    Ok(())
}
