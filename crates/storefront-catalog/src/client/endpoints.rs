//! URL construction for catalog backend endpoints.

use reqwest::Url;

use crate::error::CatalogError;
use crate::types::ProductQuery;

/// Parses and normalizes the backend base URL so that it ends with exactly
/// one slash; `"http://host/api"` and `"http://host/api/"` are equivalent.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason,
    };

    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/")).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL".to_owned()));
    }
    Ok(url)
}

/// Appends path segments (percent-encoded) plus the trailing slash the
/// backend's router requires.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CatalogError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CatalogError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments)
        .push("");
    Ok(url)
}

pub(crate) fn products_url(base: &Url, query: &ProductQuery) -> Result<Url, CatalogError> {
    let mut url = endpoint(base, &["products"])?;
    let pairs = query.to_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

pub(crate) fn product_url(base: &Url, slug: &str) -> Result<Url, CatalogError> {
    endpoint(base, &["products", slug])
}

pub(crate) fn categories_url(base: &Url) -> Result<Url, CatalogError> {
    endpoint(base, &["products", "categories"])
}

pub(crate) fn category_url(base: &Url, slug: &str) -> Result<Url, CatalogError> {
    endpoint(base, &["products", "categories", slug])
}
