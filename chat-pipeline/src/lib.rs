//! Chat orchestration: search → prompt → completion → persist.
//!
//! Public API: [`ChatPipeline`]. It looks up ranked passages for the user
//! message, replays recent turns of the session, asks the completion service,
//! stores the exchange as a [`ChatTurn`] and reports timing plus the scores of
//! the two best passages. It also attaches user feedback to stored turns.

mod api_types;
mod cfg;
mod error;
pub mod prompt;
pub mod select;

use std::sync::Arc;

use ai_llm_service::{CompletionProvider, CompletionRequest};
use chrono::Utc;
use history_store::{ChatTurn, HistoryStore};
use rag_search::{SearchProvider, WARMUP_QUERY};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

pub use api_types::{ChatInput, ChatOutcome, FeedbackInput};
pub use cfg::PipelineConfig;
pub use error::PipelineError;

/// Composes the search, completion and history adapters.
///
/// Cheap to share: wrap in `Arc` and hand to every request.
pub struct ChatPipeline {
    search: Arc<dyn SearchProvider>,
    completion: Arc<dyn CompletionProvider>,
    history: Arc<dyn HistoryStore>,
    cfg: PipelineConfig,
}

impl ChatPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        completion: Arc<dyn CompletionProvider>,
        history: Arc<dyn HistoryStore>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            search,
            completion,
            history,
            cfg,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Answer one chat message.
    ///
    /// `elapsed_time` covers search, history read and completion; the store
    /// write afterwards is not included.
    ///
    /// # Errors
    /// - [`PipelineError::Validation`] for a blank message
    /// - [`PipelineError::Search`] / [`PipelineError::Completion`] for upstream failures
    /// - [`PipelineError::Storage`] when history cannot be read or the turn cannot be saved
    #[instrument(skip_all, fields(session_id = %input.session_id, user_id = %input.user_id))]
    pub async fn handle_chat(&self, input: ChatInput) -> Result<ChatOutcome, PipelineError> {
        let question = input.message.trim();
        if question.is_empty() {
            return Err(PipelineError::Validation("message must not be empty".into()));
        }

        // 1) Start the clock
        let started = Instant::now();

        // 2) Retrieve ranked passages
        let passages = self
            .search
            .search(question)
            .await
            .map_err(PipelineError::Search)?;
        debug!(hits = passages.len(), "search returned");
        // 3) Rank; the two best are always scored, `context_k` bounds the prompt only
        // 3) Rank once; the two best are always scored, `context_k` only bounds the prompt
        let keep = self.cfg.context_k.max(select::SCORED_CHUNKS);
        let ranked = select::top_passages(passages, keep);
        let (first_chunk, second_chunk) = select::chunk_scores(&ranked);
        let selected = &ranked[..self.cfg.context_k.min(ranked.len())];

        // 4) Replay recent turns of this session
        let prior = if self.cfg.history_turns > 0 {
            self.history
                .recent_turns(&input.session_id, self.cfg.history_turns)
                .await?
        } else {
            Vec::new()
        };

        // 5) Build prompts
        let request = CompletionRequest {
            system: Some(prompt::DEFAULT_SYSTEM.trim().to_string()),
            history: prompt::history_messages(&prior),
            prompt: prompt::build_user_prompt(question, selected, self.cfg.max_context_chars),
        };

        // 6) Generate
        let response = self
            .completion
            .complete(&request)
            .await
            .map_err(PipelineError::Completion)?;
        let elapsed_time = round3(started.elapsed().as_secs_f64());

        // 7) Persist the exchange
        let turn = ChatTurn {
            id: history_store::new_turn_id(),
            session_id: input.session_id,
            user_id: input.user_id,
            user_roles: input.user_roles,
            message: input.message,
            response,
            timestamp: Utc::now(),
            elapsed_time,
            first_chunk,
            second_chunk,
            sources: select::sources(selected),
            feedback: None,
        };
        self.history.append_turn(&turn).await?;

        info!(
            message_id = %turn.id,
            passages = selected.len(),
            history = prior.len(),
            elapsed_time,
            "chat turn completed"
        );

        Ok(ChatOutcome {
            message_id: turn.id,
            response: turn.response,
            session_id: turn.session_id,
            elapsed_time,
            first_chunk,
            second_chunk,
        })
    }

    /// Attach feedback to a stored turn of the given session.
    ///
    /// # Errors
    /// - [`PipelineError::Validation`] for a blank id or session
    /// - [`PipelineError::NotFound`] when the turn does not exist in the session
    /// - [`PipelineError::Storage`] on store failures
    #[instrument(skip_all, fields(session_id = %input.session_id, id = %input.id))]
    pub async fn submit_feedback(&self, input: FeedbackInput) -> Result<ChatTurn, PipelineError> {
        if input.id.trim().is_empty() {
            return Err(PipelineError::Validation("id must not be empty".into()));
        }
        if input.session_id.trim().is_empty() {
            return Err(PipelineError::Validation("sessionId must not be empty".into()));
        }

        match self
            .history
            .update_feedback(&input.session_id, &input.id, input.feedback)
            .await?
        {
            Some(turn) => {
                info!(feedback = %input.feedback, "feedback recorded");
                Ok(turn)
            }
            None => Err(PipelineError::NotFound {
                session_id: input.session_id,
                id: input.id,
            }),
        }
    }

    /// Issue one throwaway search so the semantic index is warm.
    ///
    /// Failures are logged and swallowed.
    pub async fn warm_up(&self) {
        let started = Instant::now();
        match self.search.search(WARMUP_QUERY).await {
            Ok(hits) => info!(
                hits = hits.len(),
                latency_ms = started.elapsed().as_millis(),
                "search warm-up done"
            ),
            Err(e) => warn!(error = %e, "search warm-up failed"),
        }
    }
}

fn round3(secs: f64) -> f64 {
    ((secs * 1000.0).round() / 1000.0).max(0.0)
}
