//! Pages of the JSON-store deployment: listing and player

use askama::Template;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::filters;
use super::home::ListingQuery;
use super::view::{page_links, NavButton, PageLink};
use super::{HtmlTemplate, STORE_SITE_NAME};
use crate::catalog::navigator::{locate, parse_episode_number, EpisodeOrder};
use crate::catalog::pagination::{page_slice, parse_page, total_pages};
use crate::catalog::PAGE_SIZE;
use crate::error::{AppError, AppResult};
use crate::upstream::models::StoredAnime;
use crate::upstream::store::JsonStore;

fn stream_href(anime_id: &str, episode: i64) -> String {
    format!(
        "/stream?anime-id={}&episode={}",
        urlencoding::encode(anime_id),
        episode
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCard {
    pub title: String,
    pub thumbnail: String,
    pub synopsis: String,
    pub watch_href: String,
}

#[derive(Template)]
#[template(path = "pages/store_home.html")]
pub struct StoreHomeTemplate {
    pub site_name: &'static str,
    pub search: String,
    pub cards: Vec<StoredCard>,
    pub pages: Vec<PageLink>,
}

/// Filters the collection by title or synopsis and cuts out one page
pub fn listing(animes: &[StoredAnime], query: ListingQuery) -> StoreHomeTemplate {
    let page = parse_page(query.page.as_deref());
    let search = query.search.unwrap_or_default();
    let needle = search.to_lowercase();

    let matching: Vec<&StoredAnime> = animes.iter().filter(|a| a.matches(&needle)).collect();
    let cards = page_slice(&matching, page, PAGE_SIZE)
        .iter()
        .map(|anime| StoredCard {
            title: anime.title.clone(),
            thumbnail: anime.thumbnail.clone(),
            synopsis: anime.synopsis.clone(),
            watch_href: stream_href(&anime.anime_id, 1),
        })
        .collect();

    StoreHomeTemplate {
        site_name: STORE_SITE_NAME,
        pages: page_links(page, total_pages(matching.len(), PAGE_SIZE), &search),
        search,
        cards,
    }
}

pub async fn view(State(store): State<JsonStore>, Query(query): Query<ListingQuery>) -> impl IntoResponse {
    let animes = store.read().await.into_value();
    HtmlTemplate::new(listing(&animes, query))
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    #[serde(rename = "anime-id")]
    pub anime_id: Option<String>,
    pub episode: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/store_stream.html")]
pub struct StoreStreamTemplate {
    pub site_name: &'static str,
    pub anime_id: String,
    pub title: String,
    pub number: i64,
    pub video_url: String,
    pub prev: NavButton,
    pub next: NavButton,
    pub episode_count: usize,
}

/// Player for one stored episode. Episodes are numbered in insertion order.
pub fn stream_page(animes: &[StoredAnime], query: StreamQuery) -> AppResult<StoreStreamTemplate> {
    let anime_id = query.anime_id.unwrap_or_default();
    let anime = animes
        .iter()
        .find(|a| a.anime_id == anime_id)
        .ok_or_else(|| AppError::not_found("Anime not found"))?;

    let number = parse_episode_number(query.episode.as_deref());
    let nav = locate(&anime.episodes, number, EpisodeOrder::OldestFirst)?;

    Ok(StoreStreamTemplate {
        site_name: STORE_SITE_NAME,
        title: anime.title.clone(),
        number: nav.number,
        video_url: nav.entry.link.clone(),
        prev: NavButton::new(nav.prev, |n| stream_href(&anime_id, n)),
        next: NavButton::new(nav.next, |n| stream_href(&anime_id, n)),
        episode_count: anime.episodes.len(),
        anime_id,
    })
}

pub async fn stream(
    State(store): State<JsonStore>,
    Query(query): Query<StreamQuery>,
) -> AppResult<HtmlTemplate<StoreStreamTemplate>> {
    let animes = store.read().await.into_value();
    Ok(HtmlTemplate::new(stream_page(&animes, query)?))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::pages::store_routes;
    use crate::upstream::build_http_client;
    use crate::upstream::models::StoredEpisode;
    use crate::upstream::test_support::{fake_store, spawn_fake_upstream};

    fn numbered_collection(count: usize) -> Vec<StoredAnime> {
        (1..=count)
            .map(|i| StoredAnime {
                title: format!("Donghua {:02}", i),
                synopsis: format!("Synopsis {:02}", i),
                anime_id: format!("donghua-{:02}", i),
                ..Default::default()
            })
            .collect()
    }

    fn soul_land() -> StoredAnime {
        StoredAnime {
            title: "Soul Land".into(),
            anime_id: "soul-land".into(),
            episodes: vec![
                StoredEpisode {
                    episode_number: "1".into(),
                    link: "https://cdn.example/sl-1.mp4".into(),
                },
                StoredEpisode {
                    episode_number: "2".into(),
                    link: "https://cdn.example/sl-2.mp4".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_second_page_of_25() {
        let animes = numbered_collection(25);
        let page = listing(
            &animes,
            ListingQuery {
                page: Some("2".into()),
                search: None,
            },
        );

        let titles: Vec<String> = page.cards.iter().map(|c| c.title.clone()).collect();
        let expected: Vec<String> = (11..=20).map(|i| format!("Donghua {:02}", i)).collect();
        assert_eq!(titles, expected);

        let labels: Vec<&str> = page.pages.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let mut animes = numbered_collection(3);
        animes.push(StoredAnime {
            title: "Soul Land".into(),
            synopsis: "Tang San is reborn".into(),
            anime_id: "soul-land".into(),
            ..Default::default()
        });

        let page = listing(
            &animes,
            ListingQuery {
                page: None,
                search: Some("TANG".into()),
            },
        );

        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].watch_href, "/stream?anime-id=soul-land&episode=1");
        assert_eq!(page.pages[0].href, "/?page=1&search=TANG");
    }

    #[test]
    fn test_stream_page_uses_insertion_order() {
        let animes = vec![soul_land()];
        let page = stream_page(
            &animes,
            StreamQuery {
                anime_id: Some("soul-land".into()),
                episode: Some("2".into()),
            },
        )
        .unwrap();

        assert_eq!(page.video_url, "https://cdn.example/sl-2.mp4");
        assert!(page.prev.enabled);
        assert_eq!(page.prev.href, "/stream?anime-id=soul-land&episode=1");
        assert!(!page.next.enabled);
        assert_eq!(page.episode_count, 2);
    }

    #[test]
    fn test_stream_page_not_found() {
        let animes = vec![soul_land()];

        let missing_anime = stream_page(
            &animes,
            StreamQuery {
                anime_id: Some("naruto".into()),
                episode: None,
            },
        );
        assert!(matches!(missing_anime, Err(AppError::NotFound(ref msg)) if msg == "Anime not found"));

        let missing_episode = stream_page(
            &animes,
            StreamQuery {
                anime_id: Some("soul-land".into()),
                episode: Some("3".into()),
            },
        );
        assert!(matches!(missing_episode, Err(AppError::NotFound(ref msg)) if msg == "Episode not found"));
    }

    #[tokio::test]
    async fn test_listing_over_http() {
        let collection: Value = serde_json::to_value(numbered_collection(25)).unwrap();
        let (router, _) = fake_store(collection);
        let base = spawn_fake_upstream(router).await;
        let app = store_routes(JsonStore::new(build_http_client().unwrap(), base, "nuenime1"));

        let response = app
            .clone()
            .oneshot(Request::get("/?page=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        for i in 11..=20 {
            assert!(html.contains(&format!("Donghua {:02}", i)));
        }
        assert!(!html.contains("Donghua 10"));
        assert!(!html.contains("Donghua 21"));

        let response = app
            .oneshot(
                Request::get("/stream?anime-id=missing&episode=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_templates_render() {
        let animes = vec![soul_land()];
        let home = listing(&animes, ListingQuery::default());
        assert!(home.render().unwrap().contains("Soul Land"));

        let player = stream_page(
            &animes,
            StreamQuery {
                anime_id: Some("soul-land".into()),
                episode: Some("1".into()),
            },
        )
        .unwrap();
        let html = player.render().unwrap();
        assert!(html.contains("Episode 1"));
        assert!(html.contains(&format!("<title>Soul Land - Episode 1 | {}</title>", STORE_SITE_NAME)));
    }

    #[test]
    fn test_empty_collection() {
        let page = listing(&[], ListingQuery::default());
        assert!(page.cards.is_empty());
        assert_eq!(page.pages.len(), 1);
    }
}
