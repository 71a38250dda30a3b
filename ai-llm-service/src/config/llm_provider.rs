use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the backend used for chat completion.
///
/// Selected through `LLM_KIND`; the hosted Azure OpenAI deployment is the
/// default, the other two cover local development and non-Azure hosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Azure OpenAI deployment (`api-key` header, deployment in the path).
    AzureOpenAI,
    /// Any OpenAI-compatible `/v1/chat/completions` server (Bearer auth).
    OpenAI,
    /// Local Ollama runtime (`/api/chat`).
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "azure" | "azure_openai" | "azure-openai" => Ok(LlmProvider::AzureOpenAI),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
