//! Client-side ordering and range filtering of an in-memory product list.
//!
//! Every function here borrows its input and returns a new sequence of
//! references; the caller's list is never reordered in place.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{resolve_price, ResolvedPrice};
use crate::products::Product;

/// Ordering selected by the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Backend order, which is newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// Highest rated first; unrated products last.
    Rating,
    /// Largest discount percentage first.
    Discount,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key \"{0}\"; expected newest, price_asc, price_desc, rating or discount")]
pub struct ParseSortKeyError(pub String);

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::Rating => "rating",
            SortKey::Discount => "discount",
        }
    }

    /// Value for the backend's `ordering` query parameter.
    ///
    /// `Discount` has no backend equivalent because discounts are derived
    /// here, not stored.
    #[must_use]
    pub fn backend_ordering(self) -> Option<&'static str> {
        match self {
            SortKey::Newest => Some("-created_at"),
            SortKey::PriceAsc => Some("base_price"),
            SortKey::PriceDesc => Some("-base_price"),
            SortKey::Rating => Some("-rating"),
            SortKey::Discount => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "newest" => Ok(SortKey::Newest),
            "price_asc" => Ok(SortKey::PriceAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            "rating" => Ok(SortKey::Rating),
            "discount" => Ok(SortKey::Discount),
            other => Err(ParseSortKeyError(other.to_owned())),
        }
    }
}

/// Range filters applied to resolved prices and ratings. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub min_rating: Option<Decimal>,
}

impl ProductFilter {
    /// Tests a product against every configured bound. Unrated products
    /// never satisfy a `min_rating` bound.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_resolved(product, &resolve_price(product))
    }

    fn matches_resolved(&self, product: &Product, price: &ResolvedPrice) -> bool {
        let price = price.final_price;
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        match self.min_rating {
            Some(min) => product.rating.is_some_and(|r| r >= min),
            None => true,
        }
    }
}

/// Returns `products` ordered by `key`.
///
/// The sort is stable: products with equal keys keep their input order, so
/// `Newest` is the input order unchanged.
#[must_use]
pub fn sort_products<'a, I>(products: I, key: SortKey) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    sort_resolved(
        products.into_iter().map(|p| (p, resolve_price(p))).collect(),
        key,
    )
}

/// Filters, then sorts. Prices are resolved once per product.
#[must_use]
pub fn evaluate<'a>(products: &'a [Product], filter: &ProductFilter, key: SortKey) -> Vec<&'a Product> {
    let kept = products
        .iter()
        .map(|p| (p, resolve_price(p)))
        .filter(|(p, price)| filter.matches_resolved(p, price))
        .collect();
    sort_resolved(kept, key)
}

fn sort_resolved(mut keyed: Vec<(&Product, ResolvedPrice)>, key: SortKey) -> Vec<&Product> {
    match key {
        SortKey::Newest => {}
        SortKey::PriceAsc => keyed.sort_by_key(|(_, price)| price.final_price),
        SortKey::PriceDesc => keyed.sort_by_key(|(_, price)| Reverse(price.final_price)),
        SortKey::Rating => keyed.sort_by_key(|(p, _)| Reverse(p.rating)),
        SortKey::Discount => keyed.sort_by_key(|(_, price)| Reverse(price.discount_percentage())),
    }

    keyed.into_iter().map(|(p, _)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn product(id: i64, price: &str) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            slug: format!("product-{id}"),
            category: None,
            base_price: dec(price),
            discount_price: None,
            display_price: None,
            has_variants: false,
            variants: vec![],
            rating: None,
            review_count: 0,
            image: None,
            images: vec![],
        }
    }

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn price_ascending_and_descending() {
        let products = vec![product(1, "300"), product(2, "100"), product(3, "200")];

        let asc = sort_products(&products, SortKey::PriceAsc);
        let asc_prices: Vec<Decimal> = asc.iter().map(|p| p.base_price).collect();
        assert_eq!(asc_prices, vec![dec("100"), dec("200"), dec("300")]);

        let desc = sort_products(&products, SortKey::PriceDesc);
        let desc_prices: Vec<Decimal> = desc.iter().map(|p| p.base_price).collect();
        assert_eq!(desc_prices, vec![dec("300"), dec("200"), dec("100")]);
    }

    #[test]
    fn sorting_does_not_mutate_input() {
        let products = vec![product(1, "300"), product(2, "100"), product(3, "200")];
        let _ = sort_products(&products, SortKey::PriceAsc);
        let input_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(input_ids, vec![1, 2, 3]);
    }

    #[test]
    fn newest_keeps_input_order() {
        let products = vec![product(5, "1"), product(3, "9"), product(4, "5")];
        assert_eq!(ids(&sort_products(&products, SortKey::Newest)), vec![5, 3, 4]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let products = vec![
            product(1, "50"),
            product(2, "10"),
            product(3, "50"),
            product(4, "10"),
        ];
        assert_eq!(ids(&sort_products(&products, SortKey::PriceAsc)), vec![2, 4, 1, 3]);
        assert_eq!(ids(&sort_products(&products, SortKey::PriceDesc)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn price_sort_uses_resolved_price() {
        let mut discounted = product(1, "100");
        discounted.discount_price = Some(dec("20"));
        let products = vec![discounted, product(2, "50")];
        assert_eq!(ids(&sort_products(&products, SortKey::PriceAsc)), vec![1, 2]);
    }

    #[test]
    fn rating_descending_puts_unrated_last() {
        let mut a = product(1, "10");
        a.rating = Some(dec("3.5"));
        let b = product(2, "10");
        let mut c = product(3, "10");
        c.rating = Some(dec("4.8"));
        let products = vec![a, b, c];
        assert_eq!(ids(&sort_products(&products, SortKey::Rating)), vec![3, 1, 2]);
    }

    #[test]
    fn discount_descending() {
        let mut ten_off = product(1, "100");
        ten_off.discount_price = Some(dec("90"));
        let full_price = product(2, "100");
        let mut half_off = product(3, "100");
        half_off.discount_price = Some(dec("50"));
        let products = vec![ten_off, full_price, half_off];
        assert_eq!(ids(&sort_products(&products, SortKey::Discount)), vec![3, 1, 2]);
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let products = vec![product(1, "10"), product(2, "20"), product(3, "30")];
        let filter = ProductFilter {
            min_price: Some(dec("10")),
            max_price: Some(dec("20")),
            min_rating: None,
        };
        assert_eq!(ids(&evaluate(&products, &filter, SortKey::Newest)), vec![1, 2]);
    }

    #[test]
    fn filter_min_rating_excludes_unrated() {
        let mut rated = product(1, "10");
        rated.rating = Some(dec("4"));
        let products = vec![rated, product(2, "10")];
        let filter = ProductFilter {
            min_rating: Some(dec("4")),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&products[0]));
        assert!(!filter.matches(&products[1]));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let products = vec![product(1, "10"), product(2, "0")];
        let filter = ProductFilter::default();
        assert_eq!(ids(&evaluate(&products, &filter, SortKey::Newest)), vec![1, 2]);
    }

    #[test]
    fn evaluate_filters_then_sorts() {
        let products = vec![product(1, "300"), product(2, "100"), product(3, "200")];
        let filter = ProductFilter {
            max_price: Some(dec("250")),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&evaluate(&products, &filter, SortKey::PriceDesc)), vec![3, 2]);
    }

    #[test]
    fn evaluate_filters_and_sorts_on_resolved_prices() {
        let mut marked_down = product(1, "400");
        marked_down.discount_price = Some(dec("150"));
        let products = vec![marked_down, product(2, "100"), product(3, "300")];
        let filter = ProductFilter {
            max_price: Some(dec("200")),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&evaluate(&products, &filter, SortKey::PriceDesc)), vec![1, 2]);
        assert_eq!(ids(&evaluate(&products, &filter, SortKey::Discount)), vec![1, 2]);
    }

    #[test]
    fn sort_key_parses_and_displays() {
        for key in [
            SortKey::Newest,
            SortKey::PriceAsc,
            SortKey::PriceDesc,
            SortKey::Rating,
            SortKey::Discount,
        ] {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
        assert_eq!("".parse::<SortKey>(), Ok(SortKey::Newest));
        assert_eq!(
            "cheapest".parse::<SortKey>(),
            Err(ParseSortKeyError("cheapest".to_owned()))
        );
    }

    #[test]
    fn sort_key_backend_ordering() {
        assert_eq!(SortKey::PriceAsc.backend_ordering(), Some("base_price"));
        assert_eq!(SortKey::Discount.backend_ordering(), None);
    }
}
