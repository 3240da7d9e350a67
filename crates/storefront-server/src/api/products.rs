use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_catalog::{Listing, ProductQuery};
use storefront_core::{evaluate, ProductFilter, SortKey};

use crate::middleware::RequestId;

use super::views::{cards, ProductCard, Section, VariantView};
use super::{map_catalog_error, parse_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductListPage {
    sort: SortKey,
    products: Section<ProductCard>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductDetail {
    #[serde(flatten)]
    card: ProductCard,
    images: Vec<String>,
    variants: Vec<VariantView>,
}

/// Parses the `sort` query parameter; absent or blank means newest first.
pub(super) fn parse_sort(request_id: &str, raw: Option<&str>) -> Result<SortKey, ApiError> {
    raw.unwrap_or_default()
        .parse()
        .map_err(|e: storefront_core::ParseSortKeyError| {
            ApiError::new(request_id, "bad_request", e.to_string())
        })
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ApiResponse<ProductListPage>>, ApiError> {
    let sort = parse_sort(&req_id.0, params.sort.as_deref())?;
    let filter = ProductFilter {
        min_price: parse_param(&req_id.0, "min_price", params.min_price.as_deref())?,
        max_price: parse_param(&req_id.0, "max_price", params.max_price.as_deref())?,
        min_rating: parse_param(&req_id.0, "min_rating", params.min_rating.as_deref())?,
    };

    let query = ProductQuery {
        search: params.search,
        category: params.category,
        min_price: filter.min_price,
        max_price: filter.max_price,
        ordering: sort.backend_ordering().map(str::to_owned),
    };
    let listing = Listing::from_result("product list", state.catalog.list_products(&query).await);

    // The backend filters on base_price; ranges must hold for resolved prices.
    let products = Section::new(
        cards(evaluate(&listing.items, &filter, sort), state.fomo.as_ref()),
        listing.error_message(),
    );

    Ok(Json(ApiResponse::new(
        req_id.0,
        ProductListPage { sort, products },
    )))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let product = state
        .catalog
        .get_product(&slug)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    let data = ProductDetail {
        card: ProductCard::build(&product, state.fomo.as_ref()),
        images: product.images.iter().map(|img| img.url.clone()).collect(),
        variants: product.variants.iter().map(VariantView::build).collect(),
    };

    Ok(Json(ApiResponse::new(req_id.0, data)))
}
