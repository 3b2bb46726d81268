//! HTTP surface for the product catalog.
//!
//! Handlers parse and clamp request input, delegate to [`ProductService`],
//! and shape responses with the standard envelopes. Status-code selection
//! lives in the error layer, not here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use axum_helpers::response::{no_content, ApiResponse, PaginatedResponse, Pagination};
use axum_helpers::ApiJson;
use database::DocumentStore;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteQuery, FeaturedQuery, ListQuery, Product, SearchQuery, UpdateProduct,
};
use crate::queries::{ListOptions, SearchFilters};
use crate::service::ProductService;

const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_SEARCH_LIMIT: usize = 50;
const MAX_PAGE_SIZE: usize = 100;

/// Build the product router. Mount under `/product`.
pub fn router<S: DocumentStore + 'static>(service: ProductService<S>) -> Router {
    Router::new()
        .route("/", get(list_products::<S>).post(create_product::<S>))
        .route("/search", get(search_products::<S>))
        .route("/featured", get(featured_products::<S>))
        .route(
            "/{id}",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Category not found"),
    ),
    tag = "products"
)]
pub async fn create_product<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    ApiJson(payload): ApiJson<CreateProduct>,
) -> ProductResult<Response> {
    let product = service.create_product(payload).await?;
    Ok(ApiResponse::created(product, "Product created successfully"))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
) -> ProductResult<Response> {
    let product = service.get_product_by_id(&id).await?;
    Ok(ApiResponse::success(
        product,
        "Product retrieved successfully",
    ))
}

#[utoipa::path(
    put,
    path = "/product/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProduct>,
) -> ProductResult<Response> {
    let product = service.update_product(&id, payload).await?;
    Ok(ApiResponse::success(product, "Product updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    params(
        ("id" = String, Path, description = "Product id"),
        DeleteQuery,
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteQuery>,
) -> ProductResult<Response> {
    let soft_delete = params.hard_delete != Some(true);
    service.delete_product(&id, soft_delete).await?;
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/product",
    params(ListQuery),
    responses((status = 200, description = "Product listing page", body = [Product])),
    tag = "products"
)]
pub async fn list_products<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Query(params): Query<ListQuery>,
) -> ProductResult<Response> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let ascending = params.sort_order.as_deref() == Some("asc");

    let result = service
        .get_all_products(&ListOptions {
            limit,
            ascending,
            category: params.category,
            status: params.status,
            min_price: params.min_price,
            max_price: params.max_price,
            last_evaluated_key: params.last_evaluated_key,
        })
        .await?;

    // Total is approximate: the scanned count of this page's read.
    let pagination =
        Pagination::new(page, limit, result.scanned_count).with_cursor(result.last_evaluated_key);
    Ok(
        PaginatedResponse::new(result.items, pagination, "Products retrieved successfully")
            .into_response(),
    )
}

#[utoipa::path(
    get,
    path = "/product/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = [Product]),
        (status = 400, description = "Missing search query"),
    ),
    tag = "products"
)]
pub async fn search_products<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Query(params): Query<SearchQuery>,
) -> ProductResult<Response> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| crate::error::ProductError::InvalidInput("Search query is required".to_string()))?
        .to_string();

    let filters = SearchFilters {
        category: params.category,
        min_price: params.min_price,
        max_price: params.max_price,
        limit: params
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_PAGE_SIZE),
    };
    let products = service.search_products(&query, &filters).await?;
    Ok(ApiResponse::success(
        products,
        "Search results retrieved successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/product/featured",
    params(FeaturedQuery),
    responses((status = 200, description = "Featured products", body = [Product])),
    tag = "products"
)]
pub async fn featured_products<S: DocumentStore>(
    State(service): State<Arc<ProductService<S>>>,
    Query(params): Query<FeaturedQuery>,
) -> ProductResult<Response> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let products = service.get_featured_products(limit).await?;
    Ok(ApiResponse::success(
        products,
        "Featured products retrieved successfully",
    ))
}
