use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// Top-level configuration, one section per collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub ticker: TickerConfig,
}

// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

// Row store settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Upstream movie catalog settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Sent as-is; an empty key is not rejected here, the upstream refuses it.
    pub api_key: String,
    pub language: String,
}

// Stock ticker settings
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    pub symbol: String,
    pub interval_ms: u64,
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            interval_ms: 2000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(key, default);
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let ticker = TickerConfig {
            symbol: var_or("TICKER_SYMBOL", "AAPL"),
            interval_ms: parse_var("TICKER_INTERVAL_MS", "2000")?,
        };
        if ticker.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "TICKER_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var("PORT", "3004")?,
                rust_log: var_or("RUST_LOG", "integrated_app=debug,tower_http=debug"),
            },
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite:events.db"),
                pool_size: parse_var("DB_POOL_SIZE", "5")?,
            },
            catalog: CatalogConfig {
                base_url: var_or("CATALOG_BASE_URL", "https://api.themoviedb.org/3"),
                api_key: var_or("TMDB_API_KEY", ""),
                language: var_or("CATALOG_LANGUAGE", "en-US"),
            },
            ticker,
        })
    }
}
