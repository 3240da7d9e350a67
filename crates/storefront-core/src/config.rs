use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got {raw:?}"))),
        }
    };

    let api_base_url = require("STOREFRONT_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "STOREFRONT_API_BASE_URL",
            "must start with http:// or https://".to_string(),
        ));
    }

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"));
    let bind_addr = parse_addr("STOREFRONT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "STOREFRONT_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (view-layer)");

    let countdown_window_secs = parse_u64("STOREFRONT_COUNTDOWN_WINDOW_SECS", "86400")?;
    if countdown_window_secs == 0 {
        return Err(invalid(
            "STOREFRONT_COUNTDOWN_WINDOW_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let home_section_limit = parse_usize("STOREFRONT_HOME_SECTION_LIMIT", "8")?;
    let fomo_enabled = parse_bool("STOREFRONT_FOMO_ENABLED", "true")?;

    Ok(AppConfig {
        api_base_url,
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        countdown_window_secs,
        home_section_limit,
        fomo_enabled,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
