//! In-process history store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{HistoryStore, errors::HistoryStoreError, record::ChatTurn};

/// Keeps turns per session in insertion order.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    sessions: RwLock<HashMap<String, Vec<ChatTurn>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), HistoryStoreError> {
        let mut sessions = self.sessions.write().await;
        let turns = sessions.entry(turn.session_id.clone()).or_default();
        if turns.iter().any(|t| t.id == turn.id) {
            return Err(HistoryStoreError::Conflict {
                session_id: turn.session_id.clone(),
                id: turn.id.clone(),
            });
        }
        turns.push(turn.clone());
        debug!(session_id = %turn.session_id, id = %turn.id, "turn appended");
        Ok(())
    }

    async fn get_turn(
        &self,
        session_id: &str,
        id: &str,
    ) -> Result<Option<ChatTurn>, HistoryStoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .and_then(|turns| turns.iter().find(|t| t.id == id))
            .cloned())
    }

    async fn replace_turn(&self, turn: &ChatTurn) -> Result<bool, HistoryStoreError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&turn.session_id)
            .and_then(|turns| turns.iter_mut().find(|t| t.id == turn.id));
        match slot {
            Some(existing) => {
                *existing = turn.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn recent_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, HistoryStoreError> {
        let sessions = self.sessions.read().await;
        let Some(turns) = sessions.get(session_id) else {
            return Ok(Vec::new());
        };
        let skip = turns.len().saturating_sub(limit);
        Ok(turns[skip..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::record::Feedback;

    fn turn(session: &str, id: &str, message: &str) -> ChatTurn {
        ChatTurn {
            id: id.into(),
            session_id: session.into(),
            user_id: "u".into(),
            user_roles: vec!["reader".into()],
            message: message.into(),
            response: format!("re: {message}"),
            timestamp: Utc::now(),
            elapsed_time: 0.1,
            first_chunk: None,
            second_chunk: None,
            sources: vec![],
            feedback: None,
        }
    }

    #[tokio::test]
    async fn feedback_is_scoped_to_session() {
        let store = MemoryHistoryStore::new();
        store.append_turn(&turn("s1", "a", "q1")).await.unwrap();

        let missing = store
            .update_feedback("other", "a", Feedback::Positive)
            .await
            .unwrap();
        assert!(missing.is_none());

        let updated = store
            .update_feedback("s1", "a", Feedback::Positive)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.feedback, Some(Feedback::Positive));

        // last write wins
        store
            .update_feedback("s1", "a", Feedback::Negative)
            .await
            .unwrap();
        let stored = store.get_turn("s1", "a").await.unwrap().unwrap();
        assert_eq!(stored.feedback, Some(Feedback::Negative));
        assert_eq!(stored.message, "q1");
    }

    #[tokio::test]
    async fn recent_turns_are_oldest_first_and_bounded() {
        let store = MemoryHistoryStore::new();
        for i in 0..4 {
            store
                .append_turn(&turn("s", &format!("id{i}"), &format!("m{i}")))
                .await
                .unwrap();
        }

        let recent = store.recent_turns("s", 2).await.unwrap();
        let msgs: Vec<_> = recent.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(msgs, ["m2", "m3"]);

        assert!(store.recent_turns("s", 0).await.unwrap().is_empty());
        assert!(store.recent_turns("unknown", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryHistoryStore::new();
        store.append_turn(&turn("s", "dup", "a")).await.unwrap();
        let err = store.append_turn(&turn("s", "dup", "b")).await.unwrap_err();
        assert!(matches!(err, HistoryStoreError::Conflict { ref id, .. } if id == "dup"));

        let kept = store.get_turn("s", "dup").await.unwrap().unwrap();
        assert_eq!(kept.message, "a");
    }
}
