use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Loading a feed failed; the previous catalog stays in place.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read feed {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch feed {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to parse feed {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A suggested source URL did not match the official-domain allowlist.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not an official government url: {url}")]
pub struct ValidationError {
    pub url: String,
}

/// The issue-creation page could not be opened.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("no browser available to open {0}")]
    Unavailable(String),
    #[error("invalid issue url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store serialization error on key {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Handler error: logged, then reported as a plain 500.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "something went wrong").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
