//! Prompt builder: document-assistant system message + bounded context block.

use ai_llm_service::ChatMessage;
use history_store::ChatTurn;
use rag_search::Passage;

/// System instructions for answering strictly from retrieved documents.
pub const DEFAULT_SYSTEM: &str = r#"
You are a helpful document assistant. Answer using only the information in the provided sources.
If the sources only partially cover the question, say "Based on the available information..." and give what you can.
Never answer from your own knowledge or assumptions. Ask a clarifying question when the intent is unclear.
When a source carries an image reference or link, include it in the answer where it is relevant.
Refer to earlier turns of the conversation when that helps.
"#;

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".svg"];

/// Build the user prompt: formatted passages followed by the question.
///
/// Passages keep their ranking order. Each one gets a
/// `Source N (score=…, reranker=…):` header; image sources add an
/// `[Image reference: …]` line. The context block never exceeds
/// `max_chars` bytes. With no passages the prompt is just the question.
///
/// # Example
/// ```
/// # use chat_pipeline::prompt::build_user_prompt;
/// let prompt = build_user_prompt("What is X?", &[], 2000);
/// assert_eq!(prompt, "QUESTION: What is X?");
/// ```
pub fn build_user_prompt(question: &str, passages: &[Passage], max_chars: usize) -> String {
    let context = format_context(passages, max_chars);
    if context.is_empty() {
        format!("QUESTION: {}", question.trim())
    } else {
        format!("{context}\n\nQUESTION: {}", question.trim())
    }
}

fn format_context(passages: &[Passage], max_chars: usize) -> String {
    let mut out = String::new();
    let mut budget = max_chars;

    for (i, p) in passages.iter().enumerate() {
        let sep = if out.is_empty() { "" } else { "\n\n" };
        let block = format_passage(i + 1, p);

        if sep.len() >= budget {
            break;
        }
        let room = budget - sep.len();
        if block.len() > room {
            // partial block only if its header still fits
            let cut = safe_truncate(&block, room);
            if cut.contains(":\n") {
                out.push_str(sep);
                out.push_str(cut);
            }
            break;
        }
        out.push_str(sep);
        out.push_str(&block);
        budget = room - block.len();
    }

    out
}

fn format_passage(n: usize, p: &Passage) -> String {
    let mut block = format!(
        "Source {n} (score={:.4}, reranker={:.4}):\n{}",
        p.search_score,
        p.reranker_score,
        p.content.trim()
    );
    if let Some(src) = p.source.as_deref().filter(|s| is_image(s)) {
        block.push_str(&format!("\n[Image reference: {src}]"));
    }
    block
}

fn is_image(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Replay prior turns as alternating user/assistant messages, oldest first.
pub fn history_messages(turns: &[ChatTurn]) -> Vec<ChatMessage> {
    turns
        .iter()
        .flat_map(|t| {
            [
                ChatMessage::user(t.message.clone()),
                ChatMessage::assistant(t.response.clone()),
            ]
        })
        .collect()
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
