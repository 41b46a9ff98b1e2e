use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::catalog_client::DEFAULT_BASE_URL;
use crate::view::SEARCH_DEBOUNCE;

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_base_url: String,
    pub bind_addr: String,
    pub db_connection_string: String,
    pub cache_ttl: Duration,
    pub search_debounce: Duration,
}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://shelf.sqlite?mode=rwc";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = SEARCH_DEBOUNCE.as_millis() as u64;

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable source; unset or empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match var(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {key}: {v}")),
                None => Ok(default),
            }
        };
        Ok(Config {
            catalog_base_url: var("CATALOG_BASE_URL").unwrap_or(DEFAULT_BASE_URL.into()),
            bind_addr: var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into()),
            db_connection_string: var("DB_CONNECTION_STRING")
                .unwrap_or(DEFAULT_DB_CONNECTION_STRING.into()),
            cache_ttl: Duration::from_secs(number("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?),
            search_debounce: Duration::from_millis(number(
                "SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.catalog_base_url.starts_with("http://")
            && !self.catalog_base_url.starts_with("https://")
        {
            return Err(format!(
                "CATALOG_BASE_URL must be an http(s) URL, got {}",
                self.catalog_base_url
            ));
        }
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(format!("BIND_ADDR is not a socket address: {}", self.bind_addr));
        }
        if self.cache_ttl.is_zero() {
            return Err("CACHE_TTL_SECS must be greater than zero".into());
        }
        Ok(())
    }
}
