use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape for {context}: {reason}")]
    UnexpectedShape { context: String, reason: String },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid catalog base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    /// Message safe to show a shopper in place of the section's content.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "We couldn't find what you were looking for.",
            _ => "We couldn't load this section right now. Please try again in a moment.",
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
