//! Chat history persistence.
//!
//! This crate provides:
//! - [`ChatTurn`] records with their passage scores and feedback
//! - the [`HistoryStore`] seam used by the chat pipeline
//! - an Azure Cosmos DB adapter speaking the SQL REST API
//! - an in-memory store for local runs and tests

mod config;
mod cosmos;
mod errors;
mod memory;
mod record;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use config::{CosmosConfig, HistoryConfig};
pub use cosmos::CosmosHistoryStore;
pub use errors::HistoryStoreError;
pub use memory::MemoryHistoryStore;
pub use record::{ChatTurn, ChunkScores, Feedback};

/// Append-mostly storage of chat turns, partitioned by session.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a new turn. The turn id must already be assigned.
    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), HistoryStoreError>;

    /// Looks a turn up inside its session partition.
    async fn get_turn(
        &self,
        session_id: &str,
        id: &str,
    ) -> Result<Option<ChatTurn>, HistoryStoreError>;

    /// Overwrites an existing turn. Returns `false` when it does not exist.
    async fn replace_turn(&self, turn: &ChatTurn) -> Result<bool, HistoryStoreError>;

    /// Up to `limit` most recent turns of a session, oldest first.
    async fn recent_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, HistoryStoreError>;

    /// Attaches `feedback` to a turn (last write wins).
    ///
    /// Returns `None` without mutating anything when the turn is absent.
    async fn update_feedback(
        &self,
        session_id: &str,
        id: &str,
        feedback: Feedback,
    ) -> Result<Option<ChatTurn>, HistoryStoreError> {
        let Some(mut turn) = self.get_turn(session_id, id).await? else {
            return Ok(None);
        };
        turn.feedback = Some(feedback);
        if self.replace_turn(&turn).await? {
            Ok(Some(turn))
        } else {
            Ok(None)
        }
    }
}

/// Builds the store selected by `cfg`.
pub fn open_store(cfg: &HistoryConfig) -> Result<Arc<dyn HistoryStore>, HistoryStoreError> {
    match cfg {
        HistoryConfig::Memory => {
            info!("history backend: memory");
            Ok(Arc::new(MemoryHistoryStore::new()))
        }
        HistoryConfig::Cosmos(c) => {
            info!(database = %c.database, container = %c.container, "history backend: cosmos");
            Ok(Arc::new(CosmosHistoryStore::new(c.clone())?))
        }
    }
}

/// Fresh unique identifier for a new turn.
pub fn new_turn_id() -> String {
    services::uuid::new_record_id()
}
