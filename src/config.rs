//! Runtime configuration read from environment variables

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::cache::DEFAULT_TTL;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api-otakudesu-livid.vercel.app";
pub const DEFAULT_STORE_BASE_URL: &str = "http://nue-db.vercel.app";
pub const DEFAULT_STORE_COLLECTION: &str = "nuenime1";

/// Which data source the site is deployed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Content API with listing, search, detail and episode endpoints
    Api,
    /// Self-hosted JSON store with admin forms
    Store,
}

impl Backend {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "api" => Ok(Backend::Api),
            "store" => Ok(Backend::Store),
            other => Err(anyhow!("Unknown CATALOG_BACKEND '{}', expected 'api' or 'store'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend: Backend,
    pub upstream_base_url: String,
    pub store_base_url: String,
    pub store_collection: String,
    pub cache_ttl: Duration,
    /// Interval of the background cache sweep, `None` keeps expiry lazy
    pub cache_sweep: Option<Duration>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000")
            .parse()
            .context("PORT must be a valid port number")?;
        let backend = Backend::from_name(&var("CATALOG_BACKEND", "api"))?;
        let cache_ttl_secs: u64 = var("CACHE_TTL_SECS", &DEFAULT_TTL.as_secs().to_string())
            .parse()
            .context("CACHE_TTL_SECS must be a number of seconds")?;
        let cache_sweep_secs: u64 = var("CACHE_SWEEP_SECS", "0")
            .parse()
            .context("CACHE_SWEEP_SECS must be a number of seconds")?;

        Ok(Self {
            port,
            backend,
            upstream_base_url: var("UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL),
            store_base_url: var("STORE_BASE_URL", DEFAULT_STORE_BASE_URL),
            store_collection: var("STORE_COLLECTION", DEFAULT_STORE_COLLECTION),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_sweep: (cache_sweep_secs > 0).then(|| Duration::from_secs(cache_sweep_secs)),
            static_dir: PathBuf::from(var("STATIC_DIR", "public")),
        })
    }
}
