//! Server options of an episode and selection of the playable URL

use std::future::Future;

use crate::upstream::models::EpisodeStream;
use crate::upstream::Fetched;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOption {
    pub name: String,
    pub link: String,
}

/// Every server of every mirror group, in mirror order
pub fn server_options(stream: &EpisodeStream) -> Vec<ServerOption> {
    stream
        .mirrors()
        .flat_map(|mirror| {
            mirror.servers.iter().map(move |server| ServerOption {
                name: format!("{} - {}", server.driver.trim(), mirror.quality),
                link: server.link.clone(),
            })
        })
        .collect()
}

/// Picks the URL for the player.
///
/// Without a requested server, or when it matches no option, the episode's
/// default stream is used. A matching option is resolved through `resolve`,
/// which falls back to the default when it degrades or yields nothing.
pub async fn select_stream<F, Fut>(
    stream: &EpisodeStream,
    options: &[ServerOption],
    requested: Option<&str>,
    resolve: F,
) -> String
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Fetched<String>>,
{
    let Some(requested) = requested else {
        return stream.stream_link.clone();
    };
    let Some(option) = options.iter().find(|option| option.name == requested) else {
        tracing::debug!("Requested server '{}' is not offered", requested);
        return stream.stream_link.clone();
    };

    match resolve(option.link.clone()).await {
        Fetched::Data(url) if !url.is_empty() => url,
        Fetched::Data(_) => stream.stream_link.clone(),
        Fetched::Degraded(reason) => {
            tracing::warn!("Falling back to default stream for '{}': {}", requested, reason);
            stream.stream_link.clone()
        }
    }
}
