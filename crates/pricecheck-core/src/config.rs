use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// config pointing at `./config/catalog.yaml`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let log_level = or_default("PRICECHECK_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "PRICECHECK_CATALOG_PATH",
        "./config/catalog.yaml",
    ));
    let output_path = PathBuf::from(or_default("PRICECHECK_OUTPUT_PATH", "./prices.csv"));

    let request_timeout_secs = parse_u64("PRICECHECK_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "PRICECHECK_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }

    let user_agent = or_default("PRICECHECK_USER_AGENT", "Mozilla/5.0");
    let accept_language = or_default("PRICECHECK_ACCEPT_LANGUAGE", "en-US");

    let max_concurrent_fetches = parse_usize("PRICECHECK_MAX_CONCURRENT_FETCHES", "4")?;
    if max_concurrent_fetches == 0 {
        return Err(invalid(
            "PRICECHECK_MAX_CONCURRENT_FETCHES",
            "must be at least 1".to_string(),
        ));
    }

    let accept_invalid_certs = parse_bool("PRICECHECK_ACCEPT_INVALID_CERTS", "false")?;

    Ok(AppConfig {
        log_level,
        catalog_path,
        output_path,
        request_timeout_secs,
        user_agent,
        accept_language,
        max_concurrent_fetches,
        accept_invalid_certs,
    })
}
