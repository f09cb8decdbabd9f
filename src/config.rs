use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,

    /// MySQL connection string. When unset, data lives in memory only.
    pub database_url: Option<String>,

    pub api_prefix: String,

    /// Requests per minute per peer IP on the API scope; 0 disables limiting.
    pub rate_per_min: u32,

    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:5500".to_string(),
            database_url: None,
            api_prefix: "/api".to_string(),
            rate_per_min: 1000,
            log_dir: "logs".to_string(),
        }
    }
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            rate_per_min: parsed("RATE_PER_MIN", defaults.rate_per_min)?,
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}
