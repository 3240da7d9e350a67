pub mod client;
pub mod error;
pub mod listing;
pub mod normalize;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use listing::Listing;
pub use normalize::{normalize_detail, normalize_list};
pub use types::ProductQuery;
