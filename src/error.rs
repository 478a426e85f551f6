//! Errors surfaced by page handlers
//!
//! Upstream failures never reach this type; they degrade to empty data inside
//! the clients. What remains is "not found" and unexpected faults.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::catalog::navigator::EpisodeNotFound;
use crate::upstream::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EpisodeNotFound> for AppError {
    fn from(err: EpisodeNotFound) -> Self {
        tracing::debug!("{}", err);
        AppError::not_found("Episode not found")
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let StoreError::AnimeNotFound(id) = err;
        tracing::error!("Anime ID not found: {}", id);
        AppError::not_found("Anime not found")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::NotFound(msg) => (status, msg).into_response(),
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:?}", err);
                (status, "Internal Server Error").into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("Anime not found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_episode_not_found_maps_to_404() {
        let err = AppError::from(EpisodeNotFound { number: 9, len: 3 });
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Episode not found"));
    }

    #[tokio::test]
    async fn test_unknown_anime_response() {
        let response = AppError::from(StoreError::AnimeNotFound("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Anime not found");
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = AppError::from(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }
}
