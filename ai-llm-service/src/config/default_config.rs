//! Completion backend config loaded strictly from environment variables.
//!
//! [`config_from_env`] picks the provider from `LLM_KIND` and delegates to the
//! provider-specific constructor.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`        = `azure` (default) | `openai` | `ollama`
//! - `LLM_MAX_TOKENS`  = optional max tokens (default 1000)
//! - `LLM_TEMPERATURE` = optional, `0.0..=2.0` (default 0.0)
//! - `LLM_TOP_P`       = optional, `0.0..=1.0` (default 0.95)
//! - `LLM_TIMEOUT_SECS`= optional request timeout (default 60)
//!
//! Azure OpenAI:
//! - `ENDPOINT_URL`, `DEPLOYMENT_NAME`, `API_VERSION`, `AZURE_OPENAI_API_KEY` (all mandatory)
//!
//! OpenAI-compatible:
//! - `OPENAI_URL` (default `https://api.openai.com`), `OPENAI_MODEL`, `OPENAI_API_KEY`
//!
//! Ollama:
//! - `OLLAMA_URL` (default `http://localhost:11434`), `OLLAMA_MODEL`

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, env_opt_f32, env_opt_u32, env_opt_u64, must_env, validate_http_endpoint,
        validate_range_f32,
    },
};

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_TOP_P: f32 = 0.95;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Builds the completion config for the provider named in `LLM_KIND`.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::UnsupportedProvider`] for an unknown kind
/// - any error of the provider-specific constructor
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let kind = std::env::var("LLM_KIND").unwrap_or_else(|_| "azure".into());
    match kind.parse::<LlmProvider>()? {
        LlmProvider::AzureOpenAI => config_azure_openai(),
        LlmProvider::OpenAI => config_openai(),
        LlmProvider::Ollama => config_ollama(),
    }
}

/// Constructs a config for an Azure OpenAI deployment.
///
/// # Env
/// - `ENDPOINT_URL`, `DEPLOYMENT_NAME`, `API_VERSION`, `AZURE_OPENAI_API_KEY` (required)
pub fn config_azure_openai() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = must_env("ENDPOINT_URL")?;
    validate_http_endpoint("ENDPOINT_URL", &endpoint)?;

    let mut cfg = sampling_defaults(LlmProvider::AzureOpenAI, endpoint)?;
    cfg.model = must_env("DEPLOYMENT_NAME")?;
    cfg.api_version = Some(must_env("API_VERSION")?);
    cfg.api_key = Some(must_env("AZURE_OPENAI_API_KEY")?);
    Ok(cfg)
}

/// Constructs a config for an OpenAI-compatible server.
pub fn config_openai() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = std::env::var("OPENAI_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "https://api.openai.com".into());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    let mut cfg = sampling_defaults(LlmProvider::OpenAI, endpoint)?;
    cfg.model = must_env("OPENAI_MODEL")?;
    cfg.api_key = Some(must_env("OPENAI_API_KEY")?);
    Ok(cfg)
}

/// Constructs a config for a local Ollama runtime.
pub fn config_ollama() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = std::env::var("OLLAMA_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "http://localhost:11434".into());
    validate_http_endpoint("OLLAMA_URL", &endpoint)?;

    let mut cfg = sampling_defaults(LlmProvider::Ollama, endpoint)?;
    cfg.model = must_env("OLLAMA_MODEL")?;
    Ok(cfg)
}

/// Shared sampling knobs; the caller fills in model and credentials.
fn sampling_defaults(provider: LlmProvider, endpoint: String) -> Result<LlmModelConfig, AiLlmError> {
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    let top_p = env_opt_f32("LLM_TOP_P")?.unwrap_or(DEFAULT_TOP_P);
    validate_range_f32("top_p", top_p, 0.0, 1.0)?;

    Ok(LlmModelConfig {
        provider,
        model: String::new(),
        endpoint,
        api_key: None,
        api_version: None,
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(temperature),
        top_p: Some(top_p),
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
