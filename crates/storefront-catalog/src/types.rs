use rust_decimal::Decimal;

/// Filters forwarded to `GET /products/`. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Backend ordering expression, e.g. `"-created_at"` or `"base_price"`.
    pub ordering: Option<String>,
}

impl ProductQuery {
    /// Products in one category, in backend order.
    #[must_use]
    pub fn in_category(slug: &str) -> Self {
        Self {
            category: Some(slug.to_owned()),
            ..Self::default()
        }
    }

    /// Query-string pairs, skipping absent and blank values.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let text = |key: &'static str, value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_owned()))
        };
        let amount = |key: &'static str, value: Option<Decimal>| value.map(|v| (key, v.to_string()));

        [
            text("search", &self.search),
            text("category", &self.category),
            amount("min_price", self.min_price),
            amount("max_price", self.max_price),
            text("ordering", &self.ordering),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
