//! Render-ready shapes shared by the page endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use storefront_catalog::Listing;
use storefront_core::{
    badge_for, format_price, resolve_price, Badge, CountdownState, Discount, FomoSource,
    FomoStats, Product, Remaining, Variant,
};

/// Everything a product card displays.
#[derive(Debug, Serialize)]
pub(super) struct ProductCard {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub category_slug: Option<String>,
    pub price: Decimal,
    pub price_display: String,
    /// Struck-through price, present only when it exceeds `price`.
    pub was_price: Option<Decimal>,
    pub was_price_display: Option<String>,
    pub discount: Option<Discount>,
    pub is_flash_sale: bool,
    pub badge: Option<Badge>,
    pub rating: Option<Decimal>,
    pub review_count: u32,
    pub has_variants: bool,
    pub fomo: Option<FomoStats>,
}

impl ProductCard {
    pub(super) fn build(product: &Product, fomo: &dyn FomoSource) -> Self {
        let price = resolve_price(product);
        let was_price = price.shows_was_price().then_some(price.base_price);

        Self {
            id: product.id,
            title: product.title.clone(),
            slug: product.slug.clone(),
            image: product.primary_image().map(str::to_owned),
            category_slug: product.category_slug().map(str::to_owned),
            price: price.final_price,
            price_display: format_price(price.final_price),
            was_price,
            was_price_display: was_price.map(format_price),
            discount: price.discount,
            is_flash_sale: price.is_flash_sale(),
            badge: badge_for(fomo, product, &price),
            rating: product.rating,
            review_count: product.review_count,
            has_variants: product.has_variants,
            fomo: fomo.stats(product),
        }
    }
}

/// One variant row on the product detail page.
#[derive(Debug, Serialize)]
pub(super) struct VariantView {
    pub id: Option<i64>,
    pub label: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub price_display: String,
    pub discount: Option<Discount>,
}

impl VariantView {
    pub(super) fn build(variant: &Variant) -> Self {
        let price = variant.effective_price();
        Self {
            id: variant.id,
            label: variant.label(),
            size: variant.size.clone(),
            color: variant.color.clone(),
            price,
            price_display: format_price(price),
            discount: variant
                .price
                .zip(variant.discount_price)
                .and_then(|(list, sale)| Discount::between(list, sale)),
        }
    }
}

/// A page section. A failed fetch renders as no items plus a message.
#[derive(Debug, Serialize)]
pub(super) struct Section<T: Serialize> {
    pub items: Vec<T>,
    pub error_message: Option<&'static str>,
}

impl<T: Serialize> Section<T> {
    pub(super) fn new(items: Vec<T>, error_message: Option<&'static str>) -> Self {
        Self {
            items,
            error_message,
        }
    }
}

impl<T: Serialize> From<Listing<T>> for Section<T> {
    fn from(listing: Listing<T>) -> Self {
        let error_message = listing.error_message();
        Self::new(listing.items, error_message)
    }
}

/// Countdown snapshot as sent to clients, both in page payloads and on the
/// countdown event stream.
#[derive(Debug, Serialize)]
pub(super) struct CountdownView {
    pub ends_at: DateTime<Utc>,
    pub expired: bool,
    pub remaining: Remaining,
}

impl CountdownView {
    pub(super) fn new(ends_at: DateTime<Utc>, state: CountdownState) -> Self {
        Self {
            ends_at,
            expired: state.is_expired(),
            remaining: state.remaining(),
        }
    }
}

pub(super) fn cards<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    fomo: &dyn FomoSource,
) -> Vec<ProductCard> {
    products
        .into_iter()
        .map(|product| ProductCard::build(product, fomo))
        .collect()
}

#[cfg(test)]
mod tests {
    use storefront_core::NoFomo;

    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn discounted_card_shows_was_price_and_flash_badge() {
        let card = ProductCard::build(
            &product(serde_json::json!({
                "id": 1,
                "title": "Linen Shirt",
                "slug": "linen-shirt",
                "base_price": "80.00",
                "discount_price": "56.00"
            })),
            &NoFomo,
        );
        assert_eq!(card.price_display, "$56.00");
        assert_eq!(card.was_price_display.as_deref(), Some("$80.00"));
        assert_eq!(card.discount.map(|d| d.percentage), Some(30));
        assert!(card.is_flash_sale);
        assert_eq!(card.badge, Some(Badge::FlashSale));
        assert!(card.fomo.is_none());
    }

    #[test]
    fn full_price_card_has_no_was_price_or_badge() {
        let card = ProductCard::build(
            &product(serde_json::json!({
                "id": 2,
                "title": "Wool Socks",
                "slug": "wool-socks",
                "base_price": "12.00"
            })),
            &NoFomo,
        );
        assert_eq!(card.price_display, "$12.00");
        assert!(card.was_price.is_none());
        assert!(card.discount.is_none());
        assert!(card.badge.is_none());
    }

    #[test]
    fn variant_card_shows_lowest_price_against_highest() {
        let card = ProductCard::build(
            &product(serde_json::json!({
                "id": 3,
                "title": "Hoodie",
                "slug": "hoodie",
                "base_price": null,
                "has_variants": true,
                "variants": [
                    {"size": "S", "price": "40.00"},
                    {"size": "XL", "price": "50.00", "discount_price": "45.00"}
                ]
            })),
            &NoFomo,
        );
        assert_eq!(card.price, "40.00".parse::<Decimal>().unwrap());
        assert_eq!(card.was_price, Some("50.00".parse::<Decimal>().unwrap()));
    }

    #[test]
    fn variant_view_prefers_discount_price() {
        let variant: Variant = serde_json::from_value(serde_json::json!({
            "size": "M", "color": "Navy", "price": "50.00", "discount_price": "45.00"
        }))
        .unwrap();
        let view = VariantView::build(&variant);
        assert_eq!(view.label.as_deref(), Some("M / Navy"));
        assert_eq!(view.price_display, "$45.00");
        assert_eq!(view.discount.map(|d| d.percentage), Some(10));
    }

    #[test]
    fn countdown_view_flattens_state() {
        let ends_at = Utc::now();
        let view = CountdownView::new(ends_at, CountdownState::Expired);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["expired"], true);
        assert_eq!(json["remaining"]["seconds"], 0);
    }
}
