mod cache;
mod catalog;
mod config;
mod error;
mod pages;
mod upstream;

use anyhow::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::ResponseCache;
use crate::config::{Backend, Config};
use crate::upstream::api::AnimeApi;
use crate::upstream::build_http_client;
use crate::upstream::store::JsonStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let client = build_http_client()?;

    let router = match config.backend {
        Backend::Api => {
            let cache = ResponseCache::new(config.cache_ttl);
            if let Some(every) = config.cache_sweep {
                cache.spawn_sweeper(every);
            }
            info!("Serving content API at {}", config.upstream_base_url);
            pages::api_routes(AnimeApi::new(client, config.upstream_base_url.clone(), cache))
        }
        Backend::Store => {
            info!(
                "Serving JSON store collection '{}' at {}",
                config.store_collection, config.store_base_url
            );
            pages::store_routes(JsonStore::new(
                client,
                config.store_base_url.clone(),
                config.store_collection.clone(),
            ))
        }
    };

    let app = router
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Server running on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
