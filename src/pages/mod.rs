pub mod admin;
pub mod anime;
pub mod filters;
pub mod home;
pub mod html_template;
pub mod store;
pub mod view;

use axum::routing::{get, post};
use axum::Router;

pub use html_template::HtmlTemplate;

use crate::upstream::api::AnimeApi;
use crate::upstream::store::JsonStore;

pub const API_SITE_NAME: &str = "PurNime";
pub const STORE_SITE_NAME: &str = "Anidong";

/// Routes of the content-API deployment
pub fn api_routes(api: AnimeApi) -> Router {
    Router::new()
        .route("/", get(home::view))
        .route("/anime/:anime_id", get(anime::detail))
        .route("/anime/:anime_id/:episode", get(anime::stream))
        .with_state(api)
}

/// Routes of the JSON-store deployment, admin forms included
pub fn store_routes(store: JsonStore) -> Router {
    Router::new()
        .route("/", get(store::view))
        .route("/stream", get(store::stream))
        .route("/admin", get(admin::view))
        .route("/admin/add-anime", post(admin::add_anime))
        .route("/admin/add-episode", post(admin::add_episode))
        .with_state(store)
}
