//! Chat completion adapters for the gateway.
//!
//! The pipeline only sees [`CompletionProvider`]; [`LlmService`] is the
//! production implementation that routes a [`CompletionRequest`] to the
//! backend selected in [`LlmModelConfig`].

pub mod completion;
pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;

pub use completion::{ChatMessage, ChatRole, CompletionProvider, CompletionRequest};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;
