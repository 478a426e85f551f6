//! Time-bounded cache for upstream responses
//!
//! Entries are stored as JSON values and become invisible once their TTL has
//! elapsed. Expiry is checked lazily on read; `purge_expired` can be run
//! periodically to reclaim memory.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default lifetime of a cached upstream response (24 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Cache key namespaced by the kind of upstream request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Ongoing(u32),
    Search(String),
    Detail(String),
    Episode(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Ongoing(page) => write!(f, "ongoing:{}", page),
            CacheKey::Search(query) => write!(f, "search:{}", query),
            CacheKey::Detail(endpoint) => write!(f, "detail:{}", endpoint),
            CacheKey::Episode(endpoint) => write!(f, "episode:{}", endpoint),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

/// Shared response cache. Cloning is cheap and every clone sees the same entries.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the stored value if it is still within its TTL
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(&key.to_string())?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Stores a value, replacing whatever was under the same key
    pub async fn set(&self, key: &CacheKey, value: Value) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Typed lookup. A value that no longer deserializes is treated as a miss.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                tracing::warn!("Discarding cached value for '{}': {}", key, err);
                None
            }
        }
    }

    pub async fn set_as<T: Serialize>(&self, key: &CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.set(key, json).await,
            Err(err) => tracing::warn!("Could not cache value for '{}': {}", key, err),
        }
    }

    /// Drops every expired entry and returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Periodically purges expired entries for the lifetime of the process
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    tracing::debug!("Cache sweep removed {} expired entries", removed);
                }
            }
        })
    }
}
