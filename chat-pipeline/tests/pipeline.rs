use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_llm_service::{AiLlmError, CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use chat_pipeline::{ChatInput, ChatPipeline, FeedbackInput, PipelineConfig, PipelineError};
use history_store::{Feedback, HistoryStore, MemoryHistoryStore};
use rag_search::{Passage, RagSearchError, SearchProvider};

struct FakeSearch {
    passages: Vec<Passage>,
    delay: Duration,
    fail: bool,
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, _query: &str) -> Result<Vec<Passage>, RagSearchError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(RagSearchError::Decode("boom".into()));
        }
        Ok(self.passages.clone())
    }
}

#[derive(Default)]
struct FakeLlm {
    delay: Duration,
    fail: bool,
    seen: Mutex<Vec<CompletionRequest>>,
}

#[async_trait]
impl CompletionProvider for FakeLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiLlmError> {
        tokio::time::sleep(self.delay).await;
        self.seen.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(AiLlmError::Config(
                ai_llm_service::error_handler::ConfigError::MissingVar("ENDPOINT_URL"),
            ));
        }
        Ok(format!("answer #{}", self.seen.lock().unwrap().len()))
    }
}

fn passage(content: &str, search: f64, rerank: f64) -> Passage {
    Passage {
        content: content.into(),
        search_score: search,
        reranker_score: rerank,
        source: Some(format!("https://blob/{content}.pdf")),
    }
}

fn input(session: &str, message: &str) -> ChatInput {
    ChatInput {
        message: message.into(),
        session_id: session.into(),
        user_id: "user-1".into(),
        user_roles: vec!["support".into()],
    }
}

struct Harness {
    pipeline: ChatPipeline,
    llm: Arc<FakeLlm>,
    store: Arc<MemoryHistoryStore>,
}

fn harness(search: FakeSearch, llm: FakeLlm) -> Harness {
    harness_with(search, llm, PipelineConfig::default())
}

fn harness_with(search: FakeSearch, llm: FakeLlm, cfg: PipelineConfig) -> Harness {
    let llm = Arc::new(llm);
    let store = Arc::new(MemoryHistoryStore::new());
    let pipeline = ChatPipeline::new(Arc::new(search), llm.clone(), store.clone(), cfg);
    Harness {
        pipeline,
        llm,
        store,
    }
}

fn search_with(passages: Vec<Passage>) -> FakeSearch {
    FakeSearch {
        passages,
        delay: Duration::ZERO,
        fail: false,
    }
}

#[tokio::test(start_paused = true)]
async fn elapsed_time_covers_search_and_completion() {
    let h = harness(
        FakeSearch {
            passages: vec![],
            delay: Duration::from_millis(250),
            fail: false,
        },
        FakeLlm {
            delay: Duration::from_millis(1000),
            ..Default::default()
        },
    );

    let out = h.pipeline.handle_chat(input("s", "hello")).await.unwrap();
    assert_eq!(out.elapsed_time, 1.25);
}

#[tokio::test]
async fn two_best_passages_are_scored_and_persisted() {
    let h = harness(
        search_with(vec![
            passage("low", 9.0, 0.5),
            passage("top", 4.123_456, 3.2),
            passage("mid", 5.0, 2.0),
        ]),
        FakeLlm::default(),
    );

    let out = h
        .pipeline
        .handle_chat(input("sess-A", "How to reset?"))
        .await
        .unwrap();

    assert_eq!(out.session_id, "sess-A");
    assert_eq!(out.response, "answer #1");
    let first = out.first_chunk.unwrap();
    assert_eq!(first.search_score, 4.1235);
    assert_eq!(first.reranker_score, 3.2);
    assert_eq!(out.second_chunk.unwrap().reranker_score, 2.0);

    let prompt = &h.llm.seen.lock().unwrap()[0].prompt;
    assert!(prompt.contains("Source 1 (score=4.1235, reranker=3.2000):\ntop"));
    assert!(prompt.contains("Source 2"));
    assert!(!prompt.contains("Source 3"));
    assert!(prompt.ends_with("QUESTION: How to reset?"));

    let stored = h
        .store
        .get_turn("sess-A", &out.message_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.message, "How to reset?");
    assert_eq!(stored.user_roles, vec!["support".to_string()]);
    assert_eq!(stored.sources, vec!["https://blob/top.pdf", "https://blob/mid.pdf"]);
    assert!(stored.feedback.is_none());
}

#[tokio::test]
async fn top_two_scores_do_not_depend_on_prompt_context_size() {
    let passages = vec![passage("a", 1.0, 3.0), passage("b", 2.0, 1.0)];

    let h = harness_with(
        search_with(passages.clone()),
        FakeLlm::default(),
        PipelineConfig {
            context_k: 1,
            ..PipelineConfig::default()
        },
    );
    let out = h.pipeline.handle_chat(input("s", "q")).await.unwrap();
    assert_eq!(out.first_chunk.unwrap().reranker_score, 3.0);
    assert_eq!(out.second_chunk.unwrap().reranker_score, 1.0);

    let prompt = &h.llm.seen.lock().unwrap()[0].prompt;
    assert!(prompt.contains("Source 1"));
    assert!(!prompt.contains("Source 2"));
    let stored = h.store.recent_turns("s", 1).await.unwrap();
    assert_eq!(stored[0].sources, vec!["https://blob/a.pdf"]);
    assert_eq!(stored[0].second_chunk, out.second_chunk);

    let h = harness_with(
        search_with(passages),
        FakeLlm::default(),
        PipelineConfig {
            context_k: 0,
            ..PipelineConfig::default()
        },
    );
    let out = h.pipeline.handle_chat(input("s", "q")).await.unwrap();
    assert_eq!(out.first_chunk.unwrap().search_score, 1.0);
    assert_eq!(out.second_chunk.unwrap().search_score, 2.0);
    assert_eq!(h.llm.seen.lock().unwrap()[0].prompt, "QUESTION: q");
}

#[tokio::test]
async fn single_passage_leaves_second_chunk_empty() {
    let h = harness(search_with(vec![passage("only", 1.0, 1.0)]), FakeLlm::default());
    let out = h.pipeline.handle_chat(input("s", "q")).await.unwrap();
    assert!(out.first_chunk.is_some());
    assert!(out.second_chunk.is_none());
}

#[tokio::test]
async fn no_passages_still_answers_with_bare_question() {
    let h = harness(search_with(vec![]), FakeLlm::default());
    let out = h.pipeline.handle_chat(input("s", "anything?")).await.unwrap();

    assert!(out.first_chunk.is_none());
    assert!(out.second_chunk.is_none());
    assert_eq!(h.llm.seen.lock().unwrap()[0].prompt, "QUESTION: anything?");
}

#[tokio::test]
async fn prior_turns_of_the_session_are_replayed() {
    let h = harness(search_with(vec![]), FakeLlm::default());
    h.pipeline.handle_chat(input("s1", "first")).await.unwrap();
    h.pipeline.handle_chat(input("other", "unrelated")).await.unwrap();
    h.pipeline.handle_chat(input("s1", "second")).await.unwrap();

    let seen = h.llm.seen.lock().unwrap();
    let history = &seen[2].history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "first");
    assert_eq!(history[1].content, "answer #1");
    assert!(seen[2].system.is_some());
}

#[tokio::test]
async fn blank_message_is_rejected_before_search() {
    let h = harness(
        FakeSearch {
            passages: vec![],
            delay: Duration::ZERO,
            fail: true,
        },
        FakeLlm::default(),
    );
    let err = h.pipeline.handle_chat(input("s", "   ")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[tokio::test]
async fn upstream_failures_are_distinct_and_nothing_is_stored() {
    let h = harness(
        FakeSearch {
            passages: vec![],
            delay: Duration::ZERO,
            fail: true,
        },
        FakeLlm::default(),
    );
    let err = h.pipeline.handle_chat(input("s", "q")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Search(_)));
    assert!(h.llm.seen.lock().unwrap().is_empty());

    let h = harness(
        search_with(vec![]),
        FakeLlm {
            fail: true,
            ..Default::default()
        },
    );
    let err = h.pipeline.handle_chat(input("s", "q")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Completion(_)));
    assert!(h.store.recent_turns("s", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn feedback_updates_existing_turn_and_reports_missing_ones() {
    let h = harness(search_with(vec![]), FakeLlm::default());
    let out = h.pipeline.handle_chat(input("s", "q")).await.unwrap();

    let turn = h
        .pipeline
        .submit_feedback(FeedbackInput {
            id: out.message_id.clone(),
            feedback: Feedback::Positive,
            session_id: "s".into(),
        })
        .await
        .unwrap();
    assert_eq!(turn.feedback, Some(Feedback::Positive));

    let err = h
        .pipeline
        .submit_feedback(FeedbackInput {
            id: "does-not-exist".into(),
            feedback: Feedback::Negative,
            session_id: "s".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));

    // right id, other session
    let err = h
        .pipeline
        .submit_feedback(FeedbackInput {
            id: out.message_id.clone(),
            feedback: Feedback::Negative,
            session_id: "other".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));

    let err = h
        .pipeline
        .submit_feedback(FeedbackInput {
            id: out.message_id.clone(),
            feedback: Feedback::Negative,
            session_id: " ".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    let stored = h
        .store
        .get_turn("s", &out.message_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.feedback, Some(Feedback::Positive));
    assert_eq!(stored.response, out.response);
    assert!(h.store.recent_turns("other", 10).await.unwrap().is_empty());
    assert_eq!(h.store.recent_turns("s", 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn warm_up_swallows_search_failures() {
    let h = harness(
        FakeSearch {
            passages: vec![],
            delay: Duration::ZERO,
            fail: true,
        },
        FakeLlm::default(),
    );
    h.pipeline.warm_up().await;
    assert!(h.llm.seen.lock().unwrap().is_empty());
}
