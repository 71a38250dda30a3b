//! Startup configuration aggregated from every adapter crate.

use ai_llm_service::{AiLlmError, LlmModelConfig, config::default_config::config_from_env};
use chat_pipeline::PipelineConfig;
use history_store::{HistoryConfig, HistoryStoreError};
use rag_search::{RagSearchError, SearchConfig};
use thiserror::Error;

/// Configuration failure detected before the listener is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("search config: {0}")]
    Search(#[from] RagSearchError),

    #[error("llm config: {0}")]
    Llm(#[from] AiLlmError),

    #[error("history config: {0}")]
    History(#[from] HistoryStoreError),
}

/// Everything the gateway needs, read once at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Listen address, e.g. "0.0.0.0:8000".
    pub api_address: String,
    /// Allowed CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub search: SearchConfig,
    pub llm: LlmModelConfig,
    pub history: HistoryConfig,
    pub pipeline: PipelineConfig,
    /// Issue one search at startup to warm the index.
    pub search_warmup: bool,
}

impl GatewayConfig {
    /// Load from environment variables (call after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_address: std::env::var("API_ADDRESS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "0.0.0.0:8000".into()),
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
            search: SearchConfig::from_env()?,
            llm: config_from_env()?,
            history: HistoryConfig::from_env()?,
            pipeline: PipelineConfig::from_env(),
            search_warmup: parse_flag(&std::env::var("SEARCH_WARMUP").unwrap_or_default()),
        })
    }
}

/// Comma-separated origins; `*` anywhere collapses the list to "any".
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
