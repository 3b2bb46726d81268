//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog service: products, variants, pricing, and stock status"
    ),
    paths(
        domain_catalog::handlers::create_product,
        domain_catalog::handlers::get_product,
        domain_catalog::handlers::update_product,
        domain_catalog::handlers::delete_product,
        domain_catalog::handlers::list_products,
        domain_catalog::handlers::search_products,
        domain_catalog::handlers::featured_products,
    ),
    components(schemas(
        domain_catalog::models::Product,
        domain_catalog::models::Variant,
        domain_catalog::models::CreateProduct,
        domain_catalog::models::UpdateProduct,
        domain_catalog::models::VariantInput,
        domain_catalog::models::FieldError,
        domain_catalog::models::StockMode,
        domain_catalog::models::ProductStatus,
    )),
    tags(
        (name = "products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;
