//! Passage retrieval for the chat gateway.
//!
//! The pipeline depends on [`SearchProvider`]; production wiring uses
//! [`AzureSearchClient`], tests substitute in-memory fakes.

pub mod azure_search;
pub mod errors;
pub mod structs;

use async_trait::async_trait;

pub use azure_search::AzureSearchClient;
pub use errors::rag_search_error::RagSearchError;
pub use structs::{
    passage::{Passage, rank_passages},
    rag_search_config::SearchConfig,
};

/// Query used to wake the index at startup.
pub const WARMUP_QUERY: &str = "What is this document about?";

/// Retrieves ranked passages for a free-text query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns passages ordered by reranker score, best first.
    ///
    /// An empty vector is a valid answer.
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RagSearchError>;
}
