use history_store::ChunkScores;
use serde::{Deserialize, Serialize};

/// Request payload for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

/// Response payload for POST /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Id of the stored turn, used for feedback.
    pub message_id: String,
    pub response: String,
    pub session_id: String,
    /// Seconds spent in search and generation.
    pub elapsed_time: f64,
    pub first_chunk: Option<ChunkScores>,
    pub second_chunk: Option<ChunkScores>,
}
