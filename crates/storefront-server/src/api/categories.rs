use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_catalog::{Listing, ProductQuery};
use storefront_core::{sort_products, Category};

use crate::middleware::RequestId;

use super::products::parse_sort;
use super::views::{cards, ProductCard, Section};
use super::{map_catalog_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CategoryParams {
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryPage {
    category: Category,
    products: Section<ProductCard>,
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Section<Category>>> {
    let listing = Listing::from_result("category list", state.catalog.list_categories().await);
    Json(ApiResponse::new(req_id.0, listing.into()))
}

/// A category with its products. The category itself is required; its
/// product list degrades like any other section.
pub(super) async fn get_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Query(params): Query<CategoryParams>,
) -> Result<Json<ApiResponse<CategoryPage>>, ApiError> {
    let sort = parse_sort(&req_id.0, params.sort.as_deref())?;
    let query = ProductQuery {
        ordering: sort.backend_ordering().map(str::to_owned),
        ..ProductQuery::in_category(&slug)
    };

    let (category, products) = futures::join!(
        state.catalog.get_category(&slug),
        state.catalog.list_products(&query),
    );
    let category = category.map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;
    let listing = Listing::from_result("category products", products);

    // Products that name a different category are dropped; the backend may
    // ignore an unknown `category` filter and return the whole catalog.
    let in_category = listing
        .items
        .iter()
        .filter(|p| p.category.is_none() || p.belongs_to(&category));
    let products = Section::new(
        cards(sort_products(in_category, sort), state.fomo.as_ref()),
        listing.error_message(),
    );

    Ok(Json(ApiResponse::new(
        req_id.0,
        CategoryPage { category, products },
    )))
}
