use askama::Template;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::filters;
use super::view::{EpisodeLink, NavButton};
use super::{HtmlTemplate, API_SITE_NAME};
use crate::catalog::navigator::{locate, number_for_index, parse_episode_number, EpisodeOrder};
use crate::catalog::stream::{select_stream, server_options};
use crate::error::{AppError, AppResult};
use crate::upstream::api::AnimeApi;
use crate::upstream::models::{AnimeDetail, AnimeInfo, EpisodeRef};
use crate::upstream::Fetched;

const ORDER: EpisodeOrder = EpisodeOrder::NewestFirst;

fn episode_href(anime_id: &str, number: i64) -> String {
    format!("/anime/{}/{}", anime_id, number)
}

/// Links for every episode, numbered so that the oldest episode is 1
fn episode_links(anime_id: &str, episodes: &[EpisodeRef], active_index: Option<usize>) -> Vec<EpisodeLink> {
    episodes
        .iter()
        .enumerate()
        .map(|(index, episode)| {
            let number = number_for_index(episodes.len(), index, ORDER);
            EpisodeLink {
                title: episode.episode_title.clone(),
                href: episode_href(anime_id, number),
                active: active_index == Some(index),
            }
        })
        .collect()
}

/// Detail of `anime_id`. An upstream that answers with nothing at all for the
/// id means the anime does not exist; an upstream failure still renders.
async fn fetch_detail(api: &AnimeApi, anime_id: &str) -> AppResult<AnimeDetail> {
    match api.detail(anime_id).await {
        Fetched::Data(detail) if detail == AnimeDetail::default() => {
            Err(AppError::not_found("Anime not found"))
        }
        fetched => Ok(fetched.into_value()),
    }
}

#[derive(Template)]
#[template(path = "pages/detail.html")]
pub struct DetailTemplate {
    pub site_name: &'static str,
    pub info: AnimeInfo,
    pub episodes: Vec<EpisodeLink>,
}

pub fn detail_page(anime_id: &str, detail: AnimeDetail) -> DetailTemplate {
    DetailTemplate {
        site_name: API_SITE_NAME,
        episodes: episode_links(anime_id, &detail.episode_list, None),
        info: detail.anime_detail,
    }
}

pub async fn detail(
    State(api): State<AnimeApi>,
    Path(anime_id): Path<String>,
) -> AppResult<HtmlTemplate<DetailTemplate>> {
    let detail = fetch_detail(&api, &anime_id).await?;
    Ok(HtmlTemplate::new(detail_page(&anime_id, detail)))
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub server: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerChoice {
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "pages/stream.html")]
pub struct StreamTemplate {
    pub site_name: &'static str,
    pub title: String,
    pub number: i64,
    pub self_href: String,
    pub servers: Vec<ServerChoice>,
    pub has_selection: bool,
    pub stream_url: String,
    pub prev: NavButton,
    pub next: NavButton,
    pub episodes: Vec<EpisodeLink>,
    pub synopsis: String,
}

/// Player page for episode `episode` of `anime_id`
pub async fn stream_page(
    api: &AnimeApi,
    anime_id: &str,
    episode: &str,
    server: Option<&str>,
) -> AppResult<StreamTemplate> {
    let detail = fetch_detail(api, anime_id).await?;
    let number = parse_episode_number(Some(episode));
    let nav = locate(&detail.episode_list, number, ORDER)?;

    let stream = api.episode(&nav.entry.episode_endpoint).await.into_value();
    let options = server_options(&stream);
    let stream_url = select_stream(&stream, &options, server, |link| async move {
        api.resolve_stream(&link).await
    })
    .await;

    let servers: Vec<ServerChoice> = options
        .into_iter()
        .map(|option| ServerChoice {
            selected: server == Some(option.name.as_str()),
            name: option.name,
        })
        .collect();

    Ok(StreamTemplate {
        site_name: API_SITE_NAME,
        title: detail.anime_detail.title.clone(),
        number: nav.number,
        self_href: episode_href(anime_id, nav.number),
        has_selection: servers.iter().any(|s| s.selected),
        servers,
        stream_url,
        prev: NavButton::new(nav.prev, |n| episode_href(anime_id, n)),
        next: NavButton::new(nav.next, |n| episode_href(anime_id, n)),
        episodes: episode_links(anime_id, &detail.episode_list, Some(nav.index)),
        synopsis: detail.anime_detail.sinopsis.clone(),
    })
}

pub async fn stream(
    State(api): State<AnimeApi>,
    Path((anime_id, episode)): Path<(String, String)>,
    Query(query): Query<StreamQuery>,
) -> AppResult<HtmlTemplate<StreamTemplate>> {
    let page = stream_page(&api, &anime_id, &episode, query.server.as_deref()).await?;
    Ok(HtmlTemplate::new(page))
}
