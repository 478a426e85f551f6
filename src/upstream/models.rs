//! Payload shapes of the content API and the JSON store

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Marker every real episode endpoint contains. Specials and movies listed in
/// the same payload do not.
pub const EPISODE_MARKER: &str = "episode-";

/// Item of an ongoing listing or a search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default, deserialize_with = "text_or_lines")]
    pub sinopsis: String,
    #[serde(default)]
    pub detail: Vec<String>,
    #[serde(default, deserialize_with = "genre_names")]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRef {
    #[serde(default)]
    pub episode_title: String,
    #[serde(default)]
    pub episode_endpoint: String,
    #[serde(default)]
    pub episode_date: String,
}

impl EpisodeRef {
    pub fn is_episode(&self) -> bool {
        self.episode_endpoint.contains(EPISODE_MARKER)
    }
}

/// Detail payload. Episodes are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    #[serde(default)]
    pub anime_detail: AnimeInfo,
    #[serde(default)]
    pub episode_list: Vec<EpisodeRef>,
}

impl AnimeDetail {
    /// Drops entries that are not episodes
    pub fn retain_episodes(mut self) -> Self {
        self.episode_list.retain(EpisodeRef::is_episode);
        self
    }

    /// Line `index` of the detail block, empty when missing
    pub fn detail_line(&self, index: usize) -> &str {
        self.anime_detail
            .detail
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorServer {
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorGroup {
    #[serde(default)]
    pub quality: String,
    // upstream spelling
    #[serde(rename = "straming", default)]
    pub servers: Vec<MirrorServer>,
}

/// Episode payload: a default stream plus up to three mirror groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStream {
    #[serde(rename = "streamLink", default)]
    pub stream_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_embed1: Option<MirrorGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_embed2: Option<MirrorGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_embed3: Option<MirrorGroup>,
}

impl EpisodeStream {
    pub fn mirrors(&self) -> impl Iterator<Item = &MirrorGroup> {
        [&self.mirror_embed1, &self.mirror_embed2, &self.mirror_embed3]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredEpisode {
    #[serde(rename = "episodeNumber", default, deserialize_with = "string_or_number")]
    pub episode_number: String,
    #[serde(default)]
    pub link: String,
}

/// Anime record of the self-hosted JSON store. Episodes are kept in insertion
/// order, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredAnime {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub genre: String,
    #[serde(rename = "animeId", default)]
    pub anime_id: String,
    #[serde(default)]
    pub episodes: Vec<StoredEpisode>,
    /// Fields this service does not know about, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredAnime {
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.synopsis.to_lowercase().contains(needle_lowercase)
    }
}

fn text_or_lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    })
}

fn genre_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name),
            Value::Object(fields) => fields
                .get("genre_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect())
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}
