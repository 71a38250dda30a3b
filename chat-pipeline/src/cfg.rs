//! Runtime configuration loaded from environment variables.

/// Knobs of the chat pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Passages included in the prompt.
    pub context_k: usize,
    /// Prior turns of the session replayed to the model; `0` disables.
    pub history_turns: usize,
    /// Upper bound for the formatted context block.
    pub max_context_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            context_k: 2,
            history_turns: 5,
            max_context_chars: 12_000,
        }
    }
}

impl PipelineConfig {
    /// Build from `CTX_K`, `HISTORY_TURNS` and `MAX_CTX_CHARS`.
    ///
    /// # Example
    /// ```
    /// # use chat_pipeline::PipelineConfig;
    /// let cfg = PipelineConfig::from_env();
    /// assert!(cfg.max_context_chars > 0);
    /// ```
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            context_k: parse("CTX_K", dflt.context_k),
            history_turns: parse("HISTORY_TURNS", dflt.history_turns),
            max_context_chars: parse("MAX_CTX_CHARS", dflt.max_context_chars),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
