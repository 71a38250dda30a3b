use std::fmt;

use crate::config::llm_provider::LlmProvider;

/// Configuration for a chat completion backend.
///
/// # Fields
///
/// - `provider`: Which backend to call.
/// - `model`: Model identifier; for Azure this is the deployment name.
/// - `endpoint`: Base URL of the service (no trailing path).
/// - `api_key`: Required for Azure OpenAI and OpenAI, ignored by Ollama.
/// - `api_version`: Azure `api-version` query parameter.
/// - `max_tokens`, `temperature`, `top_p`: sampling parameters forwarded as-is.
/// - `timeout_secs`: Per-request timeout of the underlying HTTP client.
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,

    pub model: String,

    pub endpoint: String,

    pub api_key: Option<String>,

    pub api_version: Option<String>,

    pub max_tokens: Option<u32>,

    pub temperature: Option<f32>,

    pub top_p: Option<f32>,

    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
