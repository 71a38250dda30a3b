//! Unified error type for the rag-search crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by the search adapter.
#[derive(Debug, Error)]
pub enum RagSearchError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Search service transport ────────────────────────────────────────────
    /// Connect/timeout/TLS failure talking to the search service.
    #[error("search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The search service answered with a non-2xx status.
    #[error("search service returned HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response body did not match the expected `value[]` shape.
    #[error("failed to decode search response: {0}")]
    Decode(String),
}
