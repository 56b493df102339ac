//! Error type shared by every layer of spotbot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Spotify token could not be obtained or refreshed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote service answered with a non-success status.
    #[error("{service} API returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors that must abort the run even where a single failure would
    /// otherwise be skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Auth(_) | Error::Config(_) | Error::Api { status: 401, .. }
        )
    }
}
