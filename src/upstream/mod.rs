pub mod api;
pub mod models;
pub mod store;

use anyhow::Context;
use reqwest::Client;

/// Outcome of an upstream call.
///
/// Upstream failures never fail a page: callers render with the default value
/// of `T`, but the reason is kept so it can be logged or asserted on.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    Degraded(String),
}

impl<T> Fetched<T> {
    #[cfg(test)]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded(_))
    }
}

impl<T: Default> Fetched<T> {
    /// The fetched value, or `T::default()` when the call degraded
    pub fn into_value(self) -> T {
        match self {
            Fetched::Data(value) => value,
            Fetched::Degraded(_) => T::default(),
        }
    }
}

/// Builds the HTTP client shared by the upstream and store clients.
/// Idle connections per host are limited to keep memory usage low.
pub fn build_http_client() -> anyhow::Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(2)
        .build()
        .context("Failed to create HTTP client")
}

/// Sends a GET and decodes the JSON body, treating non-2xx statuses as errors
pub(crate) async fn get_json(client: &Client, url: &str) -> anyhow::Result<serde_json::Value> {
    tracing::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()
        .with_context(|| format!("Upstream returned an error for {}", url))?;

    response
        .json()
        .await
        .with_context(|| format!("Failed to decode JSON from {}", url))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_falls_back_to_default() {
        let fetched: Fetched<Vec<u32>> = Fetched::Degraded("timeout".into());
        assert!(fetched.is_degraded());
        assert!(fetched.into_value().is_empty());
    }
}
