//! Configuration layer: reads search settings from environment variables.

use std::fmt;

use crate::errors::rag_search_error::RagSearchError;

/// Default preview API version that supports semantic reranking.
pub const DEFAULT_API_VERSION: &str = "2023-07-01-preview";

/// Runtime configuration for the Azure Cognitive Search adapter.
#[derive(Clone)]
pub struct SearchConfig {
    /// Service base URL (e.g., "https://my-search.search.windows.net").
    pub endpoint: String,
    /// Query or admin key, sent in the `api-key` header.
    pub api_key: String,
    /// Index to query.
    pub index_name: String,
    /// Semantic configuration name used for reranking.
    pub semantic_configuration: String,
    pub api_version: String,
    /// Number of documents requested from the service.
    pub top_k: usize,
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `SEARCH_ENDPOINT` (required)
    /// - `SEARCH_KEY` (required)
    /// - `INDEX_NAME` (required)
    /// - `SEARCH_SEMANTIC_CONFIG` (default: "pr1semantic")
    /// - `SEARCH_API_VERSION` (default: "2023-07-01-preview")
    /// - `SEARCH_TOP_K` (default: 5)
    /// - `SEARCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, RagSearchError> {
        let cfg = Self {
            endpoint: read_required_env("SEARCH_ENDPOINT")?,
            api_key: read_required_env("SEARCH_KEY")?,
            index_name: read_required_env("INDEX_NAME")?,
            semantic_configuration: std::env::var("SEARCH_SEMANTIC_CONFIG")
                .unwrap_or_else(|_| "pr1semantic".into()),
            api_version: std::env::var("SEARCH_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.into()),
            top_k: read_parsed_env("SEARCH_TOP_K", 5)?,
            timeout_secs: read_parsed_env("SEARCH_TIMEOUT_SECS", 30)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Basic sanity checks shared by env and programmatic construction.
    pub fn validate(&self) -> Result<(), RagSearchError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(RagSearchError::InvalidConfig(
                "SEARCH_ENDPOINT must start with http:// or https://".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(RagSearchError::InvalidConfig(
                "SEARCH_TOP_K must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Full URL of the documents search action.
    pub fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.index_name,
            self.api_version
        )
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("semantic_configuration", &self.semantic_configuration)
            .field("api_version", &self.api_version)
            .field("top_k", &self.top_k)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn read_required_env(key: &str) -> Result<String, RagSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(RagSearchError::EnvMissing { key: key.into() }),
    }
}

/// Read a value from env, falling back to `default` when unset.
fn read_parsed_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, RagSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim().parse::<T>().map_err(|_| RagSearchError::EnvParse {
                key: key.into(),
                value: v,
            })
        }
        _ => Ok(default),
    }
}
