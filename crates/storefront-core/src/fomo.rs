//! Urgency/scarcity embellishments for product cards.
//!
//! None of these values are backed by real activity data. They are kept
//! behind [`FomoSource`] so they can be switched off by configuration and
//! replaced with [`NoFomo`] in tests.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::pricing::ResolvedPrice;
use crate::products::Product;

/// Promotional badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// Discount above the flash sale threshold. Derived from pricing, never random.
    FlashSale,
    Hot,
    BestSeller,
    LimitedStock,
}

/// Per-card activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FomoStats {
    pub sold_today: u32,
    pub viewing_now: u32,
}

pub trait FomoSource: Send + Sync {
    /// Activity counters for one product card.
    fn stats(&self, product: &Product) -> Option<FomoStats>;

    /// Promotional badge for a card that is not already a flash sale.
    fn badge(&self, product: &Product) -> Option<Badge>;

    /// Site-wide "shoppers online" figure for the home page banner.
    fn live_shoppers(&self) -> Option<u32>;
}

/// Picks the badge for a card: flash sale when the price qualifies,
/// otherwise whatever `source` decides.
#[must_use]
pub fn badge_for(source: &dyn FomoSource, product: &Product, price: &ResolvedPrice) -> Option<Badge> {
    if price.is_flash_sale() {
        Some(Badge::FlashSale)
    } else {
        source.badge(product)
    }
}

/// Disabled source: every value is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFomo;

impl FomoSource for NoFomo {
    fn stats(&self, _product: &Product) -> Option<FomoStats> {
        None
    }

    fn badge(&self, _product: &Product) -> Option<Badge> {
        None
    }

    fn live_shoppers(&self) -> Option<u32> {
        None
    }
}

/// Uniformly random values within configured ranges.
#[derive(Debug, Clone)]
pub struct RandomFomo {
    pub sold_today: RangeInclusive<u32>,
    pub viewing_now: RangeInclusive<u32>,
    pub live_shoppers: RangeInclusive<u32>,
    /// Probability in `0.0..=1.0` that a card gets a random badge.
    pub badge_probability: f64,
}

impl Default for RandomFomo {
    fn default() -> Self {
        Self {
            sold_today: 5..=120,
            viewing_now: 2..=35,
            live_shoppers: 80..=450,
            badge_probability: 0.3,
        }
    }
}

const RANDOM_BADGES: [Badge; 3] = [Badge::Hot, Badge::BestSeller, Badge::LimitedStock];

impl FomoSource for RandomFomo {
    fn stats(&self, _product: &Product) -> Option<FomoStats> {
        let mut rng = rand::rng();
        Some(FomoStats {
            sold_today: rng.random_range(self.sold_today.clone()),
            viewing_now: rng.random_range(self.viewing_now.clone()),
        })
    }

    fn badge(&self, _product: &Product) -> Option<Badge> {
        let mut rng = rand::rng();
        if !rng.random_bool(self.badge_probability.clamp(0.0, 1.0)) {
            return None;
        }
        Some(RANDOM_BADGES[rng.random_range(0..RANDOM_BADGES.len())])
    }

    fn live_shoppers(&self) -> Option<u32> {
        Some(rand::rng().random_range(self.live_shoppers.clone()))
    }
}
