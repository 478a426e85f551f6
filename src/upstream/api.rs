//! Client for the content API (ongoing listings, search, detail, episodes)
//!
//! Every call checks the response cache first and only caches successful
//! responses. Failures are logged and returned as `Fetched::Degraded` so the
//! pages can still render.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::models::{AnimeDetail, AnimeSummary, EpisodeStream};
use super::{get_json, Fetched};
use crate::cache::{CacheKey, ResponseCache};

#[derive(Debug, Clone)]
pub struct AnimeApi {
    client: Client,
    base_url: String,
    cache: ResponseCache,
}

impl AnimeApi {
    pub fn new(client: Client, base_url: impl Into<String>, cache: ResponseCache) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Ongoing anime on upstream page `page`
    pub async fn ongoing(&self, page: u32) -> Fetched<Vec<AnimeSummary>> {
        let url = format!("{}/api/v1/ongoing/{}", self.base_url, page);
        self.cached(CacheKey::Ongoing(page), &url, |body| {
            take_field(body, "ongoing")
        })
        .await
    }

    pub async fn search(&self, query: &str) -> Fetched<Vec<AnimeSummary>> {
        let Some(segment) = path_segment(query) else {
            return Fetched::Data(Vec::new());
        };
        let url = format!("{}/api/v1/search/{}", self.base_url, segment);
        self.cached(CacheKey::Search(query.to_string()), &url, |body| {
            take_field(body, "search")
        })
        .await
    }

    /// Detail of one anime with non-episode entries removed from its episode list
    pub async fn detail(&self, endpoint: &str) -> Fetched<AnimeDetail> {
        let Some(segment) = path_segment(endpoint) else {
            return Fetched::Data(AnimeDetail::default());
        };
        let url = format!("{}/api/v1/detail/{}", self.base_url, segment);
        self.cached(CacheKey::Detail(endpoint.to_string()), &url, |body| {
            serde_json::from_value::<AnimeDetail>(body).map(AnimeDetail::retain_episodes)
        })
        .await
    }

    pub async fn episode(&self, endpoint: &str) -> Fetched<EpisodeStream> {
        let Some(segment) = path_segment(endpoint) else {
            return Fetched::Data(EpisodeStream::default());
        };
        let url = format!("{}/api/v1/episode/{}", self.base_url, segment);
        self.cached(CacheKey::Episode(endpoint.to_string()), &url, serde_json::from_value)
            .await
    }

    /// Resolves a mirror server link to its playable URL. Not cached.
    pub async fn resolve_stream(&self, link: &str) -> Fetched<String> {
        let url = format!("{}{}", self.base_url, link);
        match get_json(&self.client, &url).await {
            Ok(body) => match body.get("streaming_url").and_then(Value::as_str) {
                Some(resolved) => Fetched::Data(resolved.to_string()),
                None => {
                    tracing::warn!("No streaming_url in response from {}", url);
                    Fetched::Degraded(format!("no streaming_url in response from {}", url))
                }
            },
            Err(err) => {
                tracing::error!("Error resolving stream link: {:?}", err);
                Fetched::Degraded(format!("{:#}", err))
            }
        }
    }

    async fn cached<T, F>(&self, key: CacheKey, url: &str, extract: F) -> Fetched<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Value) -> serde_json::Result<T>,
    {
        if let Some(hit) = self.cache.get_as::<T>(&key).await {
            tracing::debug!("Cache hit for '{}'", key);
            return Fetched::Data(hit);
        }

        let body = match get_json(&self.client, url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!("Error fetching '{}': {:?}", key, err);
                return Fetched::Degraded(format!("{:#}", err));
            }
        };

        match extract(body) {
            Ok(value) => {
                self.cache.set_as(&key, &value).await;
                Fetched::Data(value)
            }
            Err(err) => {
                tracing::error!("Unexpected payload for '{}': {}", key, err);
                Fetched::Degraded(format!("unexpected payload from {}: {}", url, err))
            }
        }
    }
}

/// Percent-encodes `value` as one path segment. Dot segments have no encoded
/// form that survives URL normalisation, so they are refused.
fn path_segment(value: &str) -> Option<String> {
    match value {
        "." | ".." => {
            tracing::warn!("Refusing dot segment '{}' in upstream path", value);
            None
        }
        _ => Some(urlencoding::encode(value).into_owned()),
    }
}

/// Deserializes `body[field]`, treating a missing or null field as empty
fn take_field<T: DeserializeOwned + Default>(mut body: Value, field: &str) -> serde_json::Result<T> {
    match body.get_mut(field).map(Value::take) {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => serde_json::from_value(value),
    }
}
