use history_store::Feedback;
use serde::{Deserialize, Serialize};

/// Request payload for POST /update-feedback.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Id of the turn returned by /chat as `message_id`.
    pub id: String,
    /// "positive" or "negative".
    pub feedback: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Response payload for POST /update-feedback.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub feedback: Feedback,
}
