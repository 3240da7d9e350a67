//! Catalog records as the backend serves them.
//!
//! ## Observed shape from the catalog backend
//!
//! ### Prices
//! Monetary fields arrive as decimal strings (`"129.00"`) from the default
//! serializer, or as JSON numbers when the backend is configured with
//! `COERCE_DECIMAL_TO_STRING = False`. `rust_decimal` accepts both.
//! `base_price` is sometimes `null` on draft products; we read that as zero
//! and let the pricing resolver treat it as "no price".
//!
//! ### `category`
//! List endpoints send the category primary key, some detail endpoints send
//! the slug, and the nested serializer sends the full category object. All
//! three shapes deserialize into [`CategoryRef`].
//!
//! ### Variants
//! `variants` is omitted entirely for simple products. `has_variants` may be
//! `true` while `variants` is empty when every variant was archived.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog product, read-only for the lifetime of one render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    /// Display name. Older backend versions call this field `name`.
    #[serde(alias = "name")]
    pub title: String,

    /// URL slug, e.g. `"linen-shirt"`.
    pub slug: String,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    /// List price for simple products. `null` reads as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub base_price: Decimal,

    /// Sale price for simple products, when the product is on sale.
    #[serde(default)]
    pub discount_price: Option<Decimal>,

    /// Price the backend precomputed for listings, when it does so.
    #[serde(default)]
    pub display_price: Option<Decimal>,

    #[serde(default)]
    pub has_variants: bool,

    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Average review score, typically `0.0..=5.0`.
    #[serde(default, alias = "average_rating")]
    pub rating: Option<Decimal>,

    #[serde(default, alias = "reviews_count")]
    pub review_count: u32,

    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Returns `true` when the displayed price must come from the variants.
    #[must_use]
    pub fn uses_variant_pricing(&self) -> bool {
        self.has_variants && !self.variants.is_empty()
    }

    /// Best image to show on a card: the explicit primary image, then the
    /// gallery image flagged primary, then the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.images
                    .iter()
                    .find(|img| img.is_primary)
                    .or_else(|| self.images.first())
                    .map(|img| img.url.as_str())
            })
    }

    /// Category slug when the backend sent one, either directly or embedded.
    #[must_use]
    pub fn category_slug(&self) -> Option<&str> {
        match self.category.as_ref()? {
            CategoryRef::Slug(slug) => Some(slug),
            CategoryRef::Embedded(category) => Some(&category.slug),
            CategoryRef::Id(_) => None,
        }
    }

    /// Returns `true` when `category` refers to this product's category.
    #[must_use]
    pub fn belongs_to(&self, category: &Category) -> bool {
        match &self.category {
            Some(CategoryRef::Id(id)) => *id == category.id,
            Some(CategoryRef::Slug(slug)) => *slug == category.slug,
            Some(CategoryRef::Embedded(embedded)) => embedded.id == category.id,
            None => false,
        }
    }
}

/// A purchasable option of a [`Product`], e.g. size M in navy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
}

impl Variant {
    /// The price a shopper pays: a positive discount price, else the list
    /// price, else zero.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price
            .filter(|p| *p > Decimal::ZERO)
            .or(self.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Human label such as `"M / Navy"`; `None` when neither attribute is set.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" / "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// How a product points at its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Slug(String),
    Embedded(Category),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(alias = "image")]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Option::unwrap_or_default)
}
