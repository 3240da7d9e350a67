use axum::{extract::State, Extension, Json};
use serde::Serialize;
use storefront_catalog::{Listing, ProductQuery};
use storefront_core::{
    next_window_boundary, resolve_price, sort_products, Category, CountdownState, Product,
    SortKey,
};

use crate::middleware::RequestId;

use super::views::{cards, CountdownView, ProductCard, Section};
use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct HomePage {
    live_shoppers: Option<u32>,
    deals_countdown: CountdownView,
    flash_deals: Section<ProductCard>,
    new_arrivals: Section<ProductCard>,
    top_rated: Section<ProductCard>,
    categories: Section<Category>,
}

pub(super) async fn home_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HomePage>> {
    let newest_first = ProductQuery {
        ordering: SortKey::Newest.backend_ordering().map(str::to_owned),
        ..ProductQuery::default()
    };
    let (products, categories) = futures::join!(
        state.catalog.list_products(&newest_first),
        state.catalog.list_categories(),
    );
    let products = Listing::from_result("home products", products);
    let categories = Listing::from_result("home categories", categories);

    let now = state.clock.now();
    let ends_at = next_window_boundary(now, state.countdown_window);
    let limit = state.home_section_limit;
    let fomo = state.fomo.as_ref();
    let error_message = products.error_message();

    let section = |picked: Vec<&Product>| Section::new(cards(picked, fomo), error_message);

    let page = HomePage {
        live_shoppers: state.fomo.live_shoppers(),
        deals_countdown: CountdownView::new(ends_at, CountdownState::at(ends_at, now)),
        flash_deals: section(flash_deals(&products.items, limit)),
        new_arrivals: section(products.items.iter().take(limit).collect()),
        top_rated: section(top_rated(&products.items, limit)),
        categories: categories.into(),
    };

    Json(ApiResponse::new(req_id.0, page))
}

/// Flash-sale products, deepest discount first.
fn flash_deals(products: &[Product], limit: usize) -> Vec<&Product> {
    sort_products(
        products.iter().filter(|p| resolve_price(p).is_flash_sale()),
        SortKey::Discount,
    )
    .into_iter()
    .take(limit)
    .collect()
}

/// Rated products, best first.
fn top_rated(products: &[Product], limit: usize) -> Vec<&Product> {
    sort_products(products.iter().filter(|p| p.rating.is_some()), SortKey::Rating)
        .into_iter()
        .take(limit)
        .collect()
}
