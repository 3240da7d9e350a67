use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the catalog backend, e.g. `"https://shop.example.com/api"`.
    pub api_base_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Length of the rolling deal window the home page countdown runs against.
    pub countdown_window_secs: u64,
    /// Maximum number of product cards per home page section.
    pub home_section_limit: usize,
    /// When `false`, sold-today counts, viewer counts and random badges are
    /// suppressed.
    pub fomo_enabled: bool,
}
