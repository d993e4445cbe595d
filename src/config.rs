//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project for Firestore; the in-memory store is used when unset
    pub gcp_project_id: Option<String>,

    // --- Auth ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime
    pub jwt_expires_in_secs: u64,
    /// Admin account created at startup if missing
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    // --- Market data ---
    /// DexScreener API base (without trailing slash)
    pub market_data_base_url: String,
    /// How long a fetched quote is reused
    pub quote_cache_ttl_ms: i64,
    /// Maximum number of cached token quotes
    pub quote_cache_capacity: usize,
    /// Upper bound on a single quote fetch
    pub quote_fetch_timeout: Duration,
    /// Quote fetches in flight per aggregation call
    pub max_concurrent_quote_fetches: usize,
}

pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://api.dexscreener.com/latest/dex";
pub const DEFAULT_QUOTE_CACHE_TTL_MS: i64 = 60 * 1000;
const DEFAULT_QUOTE_CACHE_CAPACITY: usize = 10_000;
const DEFAULT_QUOTE_FETCH_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_CONCURRENT_QUOTE_FETCHES: usize = 16;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: parse_or("PORT", 5000)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: non_empty("GCP_PROJECT_ID"),

            jwt_secret: env::var("JWT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            jwt_expires_in_secs: parse_or("JWT_EXPIRES_IN_SECS", 60 * 60)?,
            admin_username: non_empty("ADMIN_USERNAME"),
            admin_password: non_empty("ADMIN_PASSWORD"),

            market_data_base_url: env::var("MARKET_DATA_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_MARKET_DATA_BASE_URL.to_string()),
            quote_cache_ttl_ms: parse_or("QUOTE_CACHE_TTL_MS", DEFAULT_QUOTE_CACHE_TTL_MS)?,
            quote_cache_capacity: parse_or("QUOTE_CACHE_CAPACITY", DEFAULT_QUOTE_CACHE_CAPACITY)?,
            quote_fetch_timeout: Duration::from_millis(parse_or(
                "QUOTE_FETCH_TIMEOUT_MS",
                DEFAULT_QUOTE_FETCH_TIMEOUT_MS,
            )?),
            max_concurrent_quote_fetches: parse_or(
                "MAX_CONCURRENT_QUOTE_FETCHES",
                DEFAULT_MAX_CONCURRENT_QUOTE_FETCHES,
            )?
            .max(1),
        })
    }

    /// Config for tests: in-memory store, unreachable market data.
    pub fn test_default() -> Self {
        Self {
            port: 5000,
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: None,
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_expires_in_secs: 3600,
            admin_username: None,
            admin_password: None,
            market_data_base_url: "http://127.0.0.1:9".to_string(),
            quote_cache_ttl_ms: DEFAULT_QUOTE_CACHE_TTL_MS,
            quote_cache_capacity: 1_000,
            quote_fetch_timeout: Duration::from_millis(500),
            max_concurrent_quote_fetches: 4,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SECRET", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("MARKET_DATA_BASE_URL", "http://localhost:9999/dex/");
        env::set_var("QUOTE_CACHE_TTL_MS", "30000");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_secret, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.market_data_base_url, "http://localhost:9999/dex");
        assert_eq!(config.quote_cache_ttl_ms, 30_000);
        assert_eq!(config.quote_fetch_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        env::set_var("COIN_TRACKER_TEST_PORT", "not-a-port");
        let result: Result<u16, _> = parse_or("COIN_TRACKER_TEST_PORT", 1);
        assert!(matches!(result, Err(ConfigError::Invalid(_, _))));
    }
}
