use askama::Template;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::future::join_all;
use serde::Deserialize;

use super::filters;
use super::view::{page_links, PageLink};
use super::{HtmlTemplate, API_SITE_NAME};
use crate::catalog::pagination::{page_slice, parse_page, total_pages};
use crate::catalog::PAGE_SIZE;
use crate::upstream::api::AnimeApi;
use crate::upstream::models::{AnimeDetail, AnimeSummary};

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimeCard {
    pub href: String,
    pub title: String,
    pub thumb: String,
    pub subtitle: String,
    pub latest_episode_date: String,
    pub note: String,
}

impl AnimeCard {
    /// Card for one listing entry. A degraded detail leaves only the summary fields.
    pub fn new(summary: &AnimeSummary, detail: &AnimeDetail) -> Self {
        let info = &detail.anime_detail;
        let pick = |primary: &str, fallback: &str| {
            if primary.is_empty() { fallback.to_string() } else { primary.to_string() }
        };
        let subtitle = [detail.detail_line(2), detail.detail_line(6)]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" - ");

        Self {
            href: format!("/anime/{}", summary.endpoint),
            title: pick(&info.title, &summary.title),
            thumb: pick(&info.thumb, &summary.thumb),
            subtitle,
            latest_episode_date: detail
                .episode_list
                .first()
                .map(|e| e.episode_date.clone())
                .unwrap_or_default(),
            note: detail.detail_line(7).to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub site_name: &'static str,
    pub search: String,
    pub cards: Vec<AnimeCard>,
    pub pages: Vec<PageLink>,
}

/// Ongoing anime, or search results when `search` is set, with their details
/// fetched concurrently for the visible page only
pub async fn listing(api: &AnimeApi, query: ListingQuery) -> HomeTemplate {
    let page = parse_page(query.page.as_deref());
    let search = query.search.unwrap_or_default().trim().to_string();

    let summaries = if search.is_empty() {
        api.ongoing(page).await
    } else {
        api.search(&search).await
    }
    .into_value();

    let visible = page_slice(&summaries, page, PAGE_SIZE);
    let details = join_all(visible.iter().map(|summary| api.detail(&summary.endpoint))).await;

    let cards = visible
        .iter()
        .zip(details)
        .map(|(summary, detail)| AnimeCard::new(summary, &detail.into_value()))
        .collect();

    HomeTemplate {
        site_name: API_SITE_NAME,
        pages: page_links(page, total_pages(summaries.len(), PAGE_SIZE), &search),
        search,
        cards,
    }
}

pub async fn view(State(api): State<AnimeApi>, Query(query): Query<ListingQuery>) -> impl IntoResponse {
    HtmlTemplate::new(listing(&api, query).await)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Path;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::cache::ResponseCache;
    use crate::pages::api_routes;
    use crate::upstream::build_http_client;
    use crate::upstream::test_support::spawn_fake_upstream;

    fn ongoing_payload(count: usize) -> Value {
        let items: Vec<Value> = (1..=count)
            .map(|i| json!({"title": format!("Show {:02}", i), "endpoint": format!("show-{:02}", i)}))
            .collect();
        json!({ "ongoing": items })
    }

    async fn fake_api() -> AnimeApi {
        let router = Router::new()
            .route("/api/v1/ongoing/:page", get(|| async { Json(ongoing_payload(25)) }))
            .route(
                "/api/v1/search/:query",
                get(|Path(query): Path<String>| async move {
                    Json(json!({"search": [{"title": query, "endpoint": "show-03"}]}))
                }),
            )
            .route(
                "/api/v1/detail/:endpoint",
                get(|Path(endpoint): Path<String>| async move {
                    if endpoint == "show-13" {
                        return Err(StatusCode::INTERNAL_SERVER_ERROR);
                    }
                    Ok(Json(json!({
                        "anime_detail": {
                            "title": format!("Detail of {}", endpoint),
                            "detail": ["a", "b", "Studio X", "c", "d", "e", "Status: Ongoing", "Rating 8"]
                        },
                        "episode_list": [
                            {"episode_title": "Ep 2", "episode_endpoint": "x-episode-2", "episode_date": "12 Okt"}
                        ]
                    })))
                }),
            );
        let base = spawn_fake_upstream(router).await;
        AnimeApi::new(build_http_client().unwrap(), base, ResponseCache::default())
    }

    #[tokio::test]
    async fn test_second_page_of_ongoing() {
        let app = api_routes(fake_api().await);

        let response = app
            .oneshot(Request::get("/?page=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();

        for i in (11..=20).filter(|i| *i != 13) {
            assert!(html.contains(&format!("Detail of show-{:02}", i)));
        }
        assert!(html.contains("Show 13"));
        assert!(!html.contains("Detail of show-10"));
        assert!(!html.contains("Detail of show-21"));

        for label in ["1", "2", "3"] {
            assert!(html.contains(&format!(">{}</a>", label)));
        }
        assert!(!html.contains(">4</a>"));
        assert!(html.contains(r#"class="page-item active""#));
    }

    #[tokio::test]
    async fn test_failed_detail_degrades_single_card() {
        let api = fake_api().await;
        let page = listing(
            &api,
            ListingQuery {
                page: Some("2".into()),
                search: None,
            },
        )
        .await;

        let broken = page.cards.iter().find(|c| c.href == "/anime/show-13").unwrap();
        assert_eq!(broken.title, "Show 13");
        assert_eq!(broken.subtitle, "");

        let healthy = page.cards.iter().find(|c| c.href == "/anime/show-12").unwrap();
        assert_eq!(healthy.title, "Detail of show-12");
        assert_eq!(healthy.subtitle, "Studio X - Status: Ongoing");
        assert_eq!(healthy.latest_episode_date, "12 Okt");
        assert_eq!(healthy.note, "Rating 8");
    }

    #[tokio::test]
    async fn test_search_uses_search_endpoint() {
        let api = fake_api().await;
        let page = listing(
            &api,
            ListingQuery {
                page: None,
                search: Some("frieren".into()),
            },
        )
        .await;

        assert_eq!(page.search, "frieren");
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].href, "/anime/show-03");
        assert_eq!(page.pages[0].href, "/?page=1&search=frieren");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_renders_empty_page() {
        let api = AnimeApi::new(
            build_http_client().unwrap(),
            "http://127.0.0.1:9",
            ResponseCache::default(),
        );
        let page = listing(&api, ListingQuery::default()).await;

        assert!(page.cards.is_empty());
        assert_eq!(page.pages.len(), 1);
        assert!(page.render().is_ok());
    }
}
