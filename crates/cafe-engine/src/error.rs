//! Engine error types.

use thiserror::Error;

/// A classification engine failed or answered with an error. Never retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine returned a non-success status code.
    #[error("Engine error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the engine.
        status: u16,
        /// The payload's `error` field, or the raw body.
        message: String,
    },

    /// The engine answered 2xx with an `{"error": ...}` payload.
    #[error("Engine reported an error: {0}")]
    Remote(String),

    /// Failed to parse an engine response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The engine endpoint configuration is unusable.
    #[error(transparent)]
    Config(#[from] cafe_config::ConfigError),
}
