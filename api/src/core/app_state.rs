use std::sync::Arc;

use ai_llm_service::LlmService;
use chat_pipeline::ChatPipeline;
use rag_search::AzureSearchClient;

use crate::core::config::{ConfigError, GatewayConfig};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat orchestration over the search, completion and history adapters.
    pub pipeline: Arc<ChatPipeline>,
    /// CORS allow-list; empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(pipeline: Arc<ChatPipeline>, allowed_origins: Vec<String>) -> Self {
        Self {
            pipeline,
            allowed_origins,
        }
    }

    /// Build the production adapters from configuration.
    pub fn from_config(cfg: &GatewayConfig) -> Result<Self, ConfigError> {
        let search = AzureSearchClient::new(cfg.search.clone())?;
        let completion = LlmService::new(cfg.llm.clone())?;
        let history = history_store::open_store(&cfg.history)?;

        let pipeline = ChatPipeline::new(
            Arc::new(search),
            Arc::new(completion),
            history,
            cfg.pipeline.clone(),
        );

        Ok(Self::new(Arc::new(pipeline), cfg.allowed_origins.clone()))
    }
}
