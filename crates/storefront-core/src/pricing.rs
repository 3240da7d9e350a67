//! Display price and discount derivation for catalog products.
//!
//! Simple products are priced from `base_price`/`discount_price`. Products
//! with variants are priced from the variants: the cheapest effective variant
//! price is shown, and the most expensive list price is the "was" price.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::products::{Product, Variant};

/// Discount percentage a product must exceed to be tagged a flash sale.
pub const FLASH_SALE_THRESHOLD_PERCENT: u8 = 20;

/// A markdown from `original_price` to `discounted_price`.
///
/// Only ever constructed when `0 < discounted_price < original_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Discount {
    /// Whole percent saved, rounded half away from zero, in `0..=100`.
    pub percentage: u8,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    pub savings: Decimal,
}

impl Discount {
    /// Builds a discount record, or `None` when the pair is not a valid
    /// markdown (non-positive prices, or a "discount" that is not lower).
    #[must_use]
    pub fn between(original_price: Decimal, discounted_price: Decimal) -> Option<Self> {
        if original_price <= Decimal::ZERO
            || discounted_price <= Decimal::ZERO
            || discounted_price >= original_price
        {
            return None;
        }

        let savings = original_price - discounted_price;
        let percentage = (savings / original_price * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u8()
            .unwrap_or(0)
            .min(100);

        Some(Self {
            percentage,
            original_price,
            discounted_price,
            savings,
        })
    }

    #[must_use]
    pub fn is_flash_sale(&self) -> bool {
        self.percentage > FLASH_SALE_THRESHOLD_PERCENT
    }
}

/// Everything a product card needs to render its price block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPrice {
    /// Price the shopper pays.
    pub final_price: Decimal,
    /// Strikethrough price: `base_price` for simple products, the highest
    /// variant list price otherwise.
    pub base_price: Decimal,
    pub discount: Option<Discount>,
}

impl ResolvedPrice {
    /// Discount percentage, `0` when there is no discount.
    #[must_use]
    pub fn discount_percentage(&self) -> u8 {
        self.discount.map_or(0, |d| d.percentage)
    }

    #[must_use]
    pub fn is_flash_sale(&self) -> bool {
        self.discount.is_some_and(|d| d.is_flash_sale())
    }

    /// Whether the card should show `base_price` struck through.
    #[must_use]
    pub fn shows_was_price(&self) -> bool {
        self.base_price > self.final_price
    }
}

/// Derives the displayable price of `product`.
#[must_use]
pub fn resolve_price(product: &Product) -> ResolvedPrice {
    if product.uses_variant_pricing() {
        resolve_variant_price(&product.variants)
    } else {
        resolve_simple_price(product)
    }
}

fn resolve_simple_price(product: &Product) -> ResolvedPrice {
    let base_price = product.base_price;
    let discount = product
        .discount_price
        .and_then(|discount_price| Discount::between(base_price, discount_price));

    let final_price = match discount {
        Some(d) => d.discounted_price,
        // All variants archived: fall back to the backend's listing price.
        None if product.has_variants => product
            .display_price
            .filter(|p| *p > Decimal::ZERO)
            .unwrap_or(base_price),
        None => base_price,
    };

    ResolvedPrice {
        final_price,
        base_price,
        discount,
    }
}

fn resolve_variant_price(variants: &[Variant]) -> ResolvedPrice {
    let cheapest = variants.iter().min_by_key(|v| v.effective_price());

    let final_price = cheapest.map_or(Decimal::ZERO, Variant::effective_price);
    let base_price = variants
        .iter()
        .filter_map(|v| v.price)
        .max()
        .unwrap_or(Decimal::ZERO);

    let discount = cheapest
        .and_then(|v| v.price.zip(v.discount_price))
        .and_then(|(price, discount_price)| Discount::between(price, discount_price));

    ResolvedPrice {
        final_price,
        base_price,
        discount,
    }
}

/// Formats an amount for display, e.g. `"$12.99"`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
