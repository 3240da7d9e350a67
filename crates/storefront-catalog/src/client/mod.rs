//! HTTP client for the catalog backend's REST API.

mod endpoints;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use storefront_core::{Category, Product};

use crate::error::CatalogError;
use crate::normalize::{normalize_detail, normalize_list};
use crate::types::ProductQuery;

/// HTTP client for the catalog backend.
///
/// Each call issues exactly one GET request. There is no retry and no
/// de-duplication of in-flight requests: a failed call simply returns an
/// error, and callers decide whether to degrade (see [`crate::Listing`]).
///
/// 404 responses become [`CatalogError::NotFound`]; any other non-2xx status
/// becomes [`CatalogError::UnexpectedStatus`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the backend rooted at `base_url`
    /// (e.g. `"https://shop.example.com/api"`).
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    /// - [`CatalogError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let base_url = endpoints::parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Normalized base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /products/` with the given filters.
    ///
    /// Accepts both the paginated envelope and a bare list; only the items of
    /// the returned page are used.
    ///
    /// # Errors
    ///
    /// Any [`CatalogError`] from the request or from normalization.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let url = endpoints::products_url(&self.base_url, query)?;
        let body = self.get_body(url).await?;
        let products: Vec<Product> = normalize_list(&body, "product list")?;
        tracing::debug!(count = products.len(), ?query, "fetched product list");
        Ok(products)
    }

    /// `GET /products/{slug}/`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown slug, or any other
    /// [`CatalogError`] from the request or from deserialization.
    pub async fn get_product(&self, slug: &str) -> Result<Product, CatalogError> {
        let url = endpoints::product_url(&self.base_url, slug)?;
        self.get_detail(url, &format!("product {slug}")).await
    }

    /// `GET /products/categories/`.
    ///
    /// # Errors
    ///
    /// Any [`CatalogError`] from the request or from normalization.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let url = endpoints::categories_url(&self.base_url)?;
        let body = self.get_body(url).await?;
        normalize_list(&body, "category list")
    }

    /// `GET /products/categories/{slug}/`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown slug, or any other
    /// [`CatalogError`] from the request or from deserialization.
    pub async fn get_category(&self, slug: &str) -> Result<Category, CatalogError> {
        let url = endpoints::category_url(&self.base_url, slug)?;
        self.get_detail(url, &format!("category {slug}")).await
    }

    async fn get_detail<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, CatalogError> {
        let body = self.get_body(url).await?;
        normalize_detail(&body, context)
    }

    /// Issues the GET and maps non-success statuses to typed errors.
    async fn get_body(&self, url: Url) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
