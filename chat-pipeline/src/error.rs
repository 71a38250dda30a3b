//! Typed error for the chat pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller input rejected before any upstream call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The search service failed.
    #[error("search failed: {0}")]
    Search(#[source] rag_search::RagSearchError),

    /// The completion service failed.
    #[error("completion failed: {0}")]
    Completion(#[source] ai_llm_service::AiLlmError),

    /// Reading or writing chat history failed.
    #[error("history store failed: {0}")]
    Storage(#[from] history_store::HistoryStoreError),

    /// No turn with this id exists in the session.
    #[error("message {id} not found in session {session_id}")]
    NotFound { session_id: String, id: String },
}
