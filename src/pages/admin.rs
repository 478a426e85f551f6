//! Admin forms of the JSON-store deployment

use askama::Template;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use super::{HtmlTemplate, STORE_SITE_NAME};
use crate::error::AppResult;
use crate::upstream::models::{StoredAnime, StoredEpisode};
use crate::upstream::store::JsonStore;

pub struct AnimeOption {
    pub anime_id: String,
    pub title: String,
    pub episode_count: usize,
}

#[derive(Template)]
#[template(path = "pages/admin.html")]
pub struct AdminTemplate {
    pub site_name: &'static str,
    pub animes: Vec<AnimeOption>,
}

pub async fn view(State(store): State<JsonStore>) -> HtmlTemplate<AdminTemplate> {
    let animes = store
        .read()
        .await
        .into_value()
        .into_iter()
        .map(|anime| AnimeOption {
            episode_count: anime.episodes.len(),
            anime_id: anime.anime_id,
            title: anime.title,
        })
        .collect();

    HtmlTemplate::new(AdminTemplate {
        site_name: STORE_SITE_NAME,
        animes,
    })
}

#[derive(Debug, Deserialize)]
pub struct AddAnimeForm {
    pub title: String,
    pub synopsis: String,
    pub thumbnail: String,
    pub genre: String,
    #[serde(rename = "animeId")]
    pub anime_id: String,
}

/// Store failures are logged by the client and the admin page is shown again
pub async fn add_anime(
    State(store): State<JsonStore>,
    Form(form): Form<AddAnimeForm>,
) -> Redirect {
    store
        .add_anime(StoredAnime {
            title: form.title,
            synopsis: form.synopsis,
            thumbnail: form.thumbnail,
            genre: form.genre,
            anime_id: form.anime_id,
            ..Default::default()
        })
        .await;
    Redirect::to("/admin")
}

#[derive(Debug, Deserialize)]
pub struct AddEpisodeForm {
    #[serde(rename = "animeId")]
    pub anime_id: String,
    pub episode: String,
    pub link: String,
}

pub async fn add_episode(
    State(store): State<JsonStore>,
    Form(form): Form<AddEpisodeForm>,
) -> AppResult<Redirect> {
    store
        .add_episode(
            &form.anime_id,
            StoredEpisode {
                episode_number: form.episode,
                link: form.link,
            },
        )
        .await?;
    Ok(Redirect::to("/admin"))
}
