use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the workspace crates whose events we render.
pub const TARGET_PREFIXES: [&str; 6] = [
    "chat_gateway",
    "api",
    "chat_pipeline",
    "rag_search",
    "history_store",
    "ai_llm_service",
];

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2026-10-16T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Formatting layer that renders only events emitted by the gateway crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration of instrumented handlers and pipeline calls)
/// - ANSI colors only when stdout is a terminal
///
/// Dependency noise (hyper, reqwest internals) is dropped by the per-layer
/// filter without touching the global `EnvFilter`.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    let only_gateway = filter::filter_fn(|meta| is_gateway_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_gateway)
}

/// `RUST_LOG` when set and valid, otherwise `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn is_gateway_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target == *p
            || target
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_workspace_targets_only() {
        assert!(is_gateway_target("api"));
        assert!(is_gateway_target("rag_search::search"));
        assert!(is_gateway_target("history_store::cosmos"));
        assert!(!is_gateway_target("hyper::proto"));
        assert!(!is_gateway_target("apiary"));
    }
}
