//! Public API types re-used by external crates (e.g., the HTTP API layer).

use history_store::{ChunkScores, Feedback};

/// One incoming chat message.
///
/// # Example
/// ```
/// use chat_pipeline::ChatInput;
/// let input = ChatInput {
///     message: "How do I rotate the keys?".into(),
///     session_id: "6b0e...".into(),
///     user_id: "u-42".into(),
///     user_roles: vec![],
/// };
/// assert!(!input.message.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct ChatInput {
    pub message: String,
    pub session_id: String,
    pub user_id: String,
    pub user_roles: Vec<String>,
}

/// Reply together with timing and the scores of the passages used.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatOutcome {
    /// Id of the persisted turn; feedback refers to it.
    pub message_id: String,
    pub response: String,
    pub session_id: String,
    /// Seconds from search start to completion return, 3 decimals.
    pub elapsed_time: f64,
    pub first_chunk: Option<ChunkScores>,
    pub second_chunk: Option<ChunkScores>,
}

/// Feedback on a prior reply.
#[derive(Clone, Debug)]
pub struct FeedbackInput {
    pub id: String,
    pub feedback: Feedback,
    pub session_id: String,
}
