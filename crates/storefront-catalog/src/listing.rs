//! Section-level degradation of fetch failures.
//!
//! A failed fetch never takes the page down: the section renders with no
//! items and a message, and the rest of the page renders normally.

use crate::error::CatalogError;

/// Items for one page section, plus the error that emptied it, if any.
#[derive(Debug)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub error: Option<CatalogError>,
}

impl<T> Listing<T> {
    /// Converts a fetch result into a renderable section, logging failures.
    #[must_use]
    pub fn from_result(section: &str, result: Result<Vec<T>, CatalogError>) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(error) => {
                tracing::warn!(section, error = %error, "catalog fetch failed; rendering empty section");
                Self {
                    items: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    /// Shopper-facing message when the section failed to load.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(CatalogError::user_message)
    }
}
