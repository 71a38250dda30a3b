//! Completion service shared by all requests.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and hand it to the pipeline.
//! - Holds exactly one backend client, chosen by `LlmModelConfig::provider`.

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    completion::{CompletionProvider, CompletionRequest},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

enum Backend {
    OpenAi(OpenAiService),
    Ollama(OllamaService),
}

/// Production [`CompletionProvider`].
pub struct LlmService {
    backend: Backend,
    provider: LlmProvider,
    model: String,
}

impl LlmService {
    /// Builds the backend client for `cfg.provider`.
    ///
    /// # Errors
    /// Propagates constructor validation errors of the selected backend.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = cfg.provider;
        let model = cfg.model.clone();
        let backend = match provider {
            LlmProvider::AzureOpenAI | LlmProvider::OpenAI => Backend::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => Backend::Ollama(OllamaService::new(cfg)?),
        };
        Ok(Self {
            backend,
            provider,
            model,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }
}

#[async_trait]
impl CompletionProvider for LlmService {
    #[instrument(skip_all, fields(provider = ?self.provider, model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiLlmError> {
        match &self.backend {
            Backend::OpenAi(cli) => cli.generate(request).await,
            Backend::Ollama(cli) => cli.generate(request).await,
        }
    }
}
