pub mod app_config;
pub mod config;
pub mod countdown;
pub mod fomo;
pub mod pricing;
pub mod products;
pub mod sorting;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use countdown::{next_window_boundary, Clock, CountdownState, Remaining, SystemClock};
pub use fomo::{badge_for, Badge, FomoSource, FomoStats, NoFomo, RandomFomo};
pub use pricing::{
    format_price, resolve_price, Discount, ResolvedPrice, FLASH_SALE_THRESHOLD_PERCENT,
};
pub use products::{Category, CategoryRef, Product, ProductImage, Variant};
pub use sorting::{evaluate, sort_products, ParseSortKeyError, ProductFilter, SortKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
