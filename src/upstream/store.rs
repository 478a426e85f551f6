//! Client for the self-hosted JSON store
//!
//! The store only knows whole collections: every mutation reads the full
//! array, changes it locally and writes the full array back.

use anyhow::Context;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use super::models::{StoredAnime, StoredEpisode};
use super::{get_json, Fetched};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Anime not found: {0}")]
    AnimeNotFound(String),
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    client: Client,
    base_url: String,
    collection: String,
}

impl JsonStore {
    pub fn new(client: Client, base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        }
    }

    /// Reads the whole collection
    pub async fn read(&self) -> Fetched<Vec<StoredAnime>> {
        let url = format!("{}/read/{}", self.base_url, self.collection);
        let body = match get_json(&self.client, &url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!("Error fetching data: {:?}", err);
                return Fetched::Degraded(format!("{:#}", err));
            }
        };
        if body.is_null() {
            return Fetched::Data(Vec::new());
        }
        match serde_json::from_value(body) {
            Ok(animes) => Fetched::Data(animes),
            Err(err) => {
                tracing::error!("Unexpected collection payload from {}: {}", url, err);
                Fetched::Degraded(format!("unexpected payload from {}: {}", url, err))
            }
        }
    }

    /// Replaces the whole collection. A failed write is logged and reported
    /// as degraded.
    pub async fn write(&self, animes: &[StoredAnime]) -> Fetched<()> {
        let url = format!("{}/write/{}", self.base_url, self.collection);
        let sent = self
            .client
            .post(&url)
            .json(&json!({ "json": animes }))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))
            .and_then(|response| {
                response
                    .error_for_status()
                    .with_context(|| format!("Store rejected write to {}", url))
            });

        match sent {
            Ok(_) => {
                tracing::info!("Wrote {} anime to '{}'", animes.len(), self.collection);
                Fetched::Data(())
            }
            Err(err) => {
                tracing::error!("Error writing data: {:?}", err);
                Fetched::Degraded(format!("{:#}", err))
            }
        }
    }

    /// Appends a new anime with no episodes
    pub async fn add_anime(&self, anime: StoredAnime) -> Fetched<()> {
        let mut animes = match self.read_for_update().await {
            Fetched::Data(animes) => animes,
            Fetched::Degraded(reason) => return Fetched::Degraded(reason),
        };
        tracing::info!("Adding anime '{}' ({})", anime.title, anime.anime_id);
        animes.push(StoredAnime {
            episodes: Vec::new(),
            ..anime
        });
        self.write(&animes).await
    }

    /// Appends an episode to the anime with `anime_id`. Only an unknown id is
    /// an error; store failures degrade like every other upstream call.
    pub async fn add_episode(
        &self,
        anime_id: &str,
        episode: StoredEpisode,
    ) -> Result<Fetched<()>, StoreError> {
        let mut animes = match self.read_for_update().await {
            Fetched::Data(animes) => animes,
            Fetched::Degraded(reason) => return Ok(Fetched::Degraded(reason)),
        };
        let anime = animes
            .iter_mut()
            .find(|a| a.anime_id == anime_id)
            .ok_or_else(|| StoreError::AnimeNotFound(anime_id.to_string()))?;

        tracing::info!(
            "Adding episode {} to '{}'",
            episode.episode_number,
            anime.anime_id
        );
        anime.episodes.push(episode);
        Ok(self.write(&animes).await)
    }

    /// Reads the collection for a mutation. After a degraded read the write is
    /// skipped so stored records are never replaced with an empty array.
    async fn read_for_update(&self) -> Fetched<Vec<StoredAnime>> {
        let fetched = self.read().await;
        if let Fetched::Degraded(reason) = &fetched {
            tracing::warn!(
                "Skipping update of '{}', read failed: {}",
                self.collection,
                reason
            );
        }
        fetched
    }
}
