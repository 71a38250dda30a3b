//! Persisted chat records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User verdict on an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Positive => "positive",
            Feedback::Negative => "negative",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Feedback::Positive),
            "negative" => Ok(Feedback::Negative),
            other => Err(format!("unknown feedback label: {other}")),
        }
    }
}

/// Relevance scores of one passage used to answer a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkScores {
    pub search_score: f64,
    pub reranker_score: f64,
}

impl ChunkScores {
    /// Both scores rounded to 4 decimal places.
    pub fn rounded(search_score: f64, reranker_score: f64) -> Self {
        Self {
            search_score: round4(search_score),
            reranker_score: round4(reranker_score),
        }
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// One user message / assistant reply exchange.
///
/// `id` is the document id and `session_id` the partition key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_roles: Vec<String>,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub elapsed_time: f64,
    pub first_chunk: Option<ChunkScores>,
    pub second_chunk: Option<ChunkScores>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}
