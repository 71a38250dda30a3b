//! Unified error types for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for history-store operations.
#[derive(Debug, Error)]
pub enum HistoryStoreError {
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Master key could not be decoded or used for signing.
    #[error("authorization error: {0}")]
    Auth(String),

    /// A turn with the same id already exists in the session.
    #[error("turn {id} already exists in session {session_id}")]
    Conflict { session_id: String, id: String },

    /// Connect/timeout/TLS failure talking to the document store.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The document store answered with an unexpected status.
    #[error("store returned HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// JSON serialization / parsing errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
