use std::sync::Arc;

use ai_llm_service::{AiLlmError, CompletionProvider, CompletionRequest};
use api::{AppState, router};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chat_pipeline::{ChatPipeline, PipelineConfig};
use history_store::{ChatTurn, Feedback, HistoryStore, HistoryStoreError, MemoryHistoryStore};
use http_body_util::BodyExt;
use rag_search::{Passage, RagSearchError, SearchProvider};
use serde_json::{Value, json};
use tower::ServiceExt;

use fakes::{FakeLlm, FakeSearch, FlakyStore, Mode};

/// Fakes shared by the tests below.
mod fakes {
    use super::*;

    #[derive(Clone, Copy, PartialEq)]
    pub enum Mode {
        Ok,
        SearchDown,
        LlmDown,
        StoreDown,
    }

    pub struct FakeSearch(pub Mode);

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search(&self, _q: &str) -> Result<Vec<Passage>, RagSearchError> {
            if self.0 == Mode::SearchDown {
                return Err(RagSearchError::InvalidConfig("index unavailable".into()));
            }
            Ok(vec![
                Passage {
                    content: "Second best".into(),
                    search_score: 3.0,
                    reranker_score: 1.5,
                    source: None,
                },
                Passage {
                    content: "Best".into(),
                    search_score: 7.123_456,
                    reranker_score: 2.75,
                    source: None,
                },
            ])
        }
    }

    pub struct FakeLlm(pub Mode);

    #[async_trait]
    impl CompletionProvider for FakeLlm {
        async fn complete(&self, _r: &CompletionRequest) -> Result<String, AiLlmError> {
            if self.0 == Mode::LlmDown {
                return Err(AiLlmError::Config(
                    ai_llm_service::error_handler::ConfigError::MissingVar("ENDPOINT_URL"),
                ));
            }
            Ok("Press and hold for five seconds.".into())
        }
    }

    /// Memory store whose writes can be made to fail.
    pub struct FlakyStore {
        pub inner: Arc<MemoryHistoryStore>,
        pub mode: Mode,
    }

    #[async_trait]
    impl HistoryStore for FlakyStore {
        async fn append_turn(&self, turn: &ChatTurn) -> Result<(), HistoryStoreError> {
            if self.mode == Mode::StoreDown {
                return Err(HistoryStoreError::Config("container missing".into()));
            }
            self.inner.append_turn(turn).await
        }

        async fn get_turn(
            &self,
            session_id: &str,
            id: &str,
        ) -> Result<Option<ChatTurn>, HistoryStoreError> {
            self.inner.get_turn(session_id, id).await
        }

        async fn replace_turn(&self, turn: &ChatTurn) -> Result<bool, HistoryStoreError> {
            self.inner.replace_turn(turn).await
        }

        async fn recent_turns(
            &self,
            session_id: &str,
            limit: usize,
        ) -> Result<Vec<ChatTurn>, HistoryStoreError> {
            self.inner.recent_turns(session_id, limit).await
        }
    }
}

fn app_with(mode: Mode, origins: Vec<String>) -> Router {
    app_on(mode, origins, Arc::new(MemoryHistoryStore::new()))
}

fn app_on(mode: Mode, origins: Vec<String>, inner: Arc<MemoryHistoryStore>) -> Router {
    let store = FlakyStore { inner, mode };
    let pipeline = ChatPipeline::new(
        Arc::new(FakeSearch(mode)),
        Arc::new(FakeLlm(mode)),
        Arc::new(store),
        PipelineConfig::default(),
    );
    router(Arc::new(AppState::new(Arc::new(pipeline), origins)))
}

fn app(mode: Mode) -> Router {
    app_with(mode, Vec::new())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn chat_body() -> Value {
    json!({
        "message": "How do I reset the device?",
        "session_id": "sess-1",
        "user_id": "user-1"
    })
}

#[tokio::test]
async fn chat_returns_reply_scores_and_message_id() {
    let res = app(Mode::Ok)
        .oneshot(post_json("/chat", chat_body()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let v = read_json(res).await;
    assert_eq!(v["response"], "Press and hold for five seconds.");
    assert_eq!(v["session_id"], "sess-1");
    assert!(v["elapsed_time"].as_f64().unwrap() >= 0.0);
    assert_eq!(v["first_chunk"]["search_score"], 7.1235);
    assert_eq!(v["first_chunk"]["reranker_score"], 2.75);
    assert_eq!(v["second_chunk"]["reranker_score"], 1.5);
    assert!(!v["message_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn feedback_round_trip_through_http() {
    let store = Arc::new(MemoryHistoryStore::new());
    let app = app_on(Mode::Ok, Vec::new(), store.clone());

    let res = app
        .clone()
        .oneshot(post_json("/chat", chat_body()))
        .await
        .unwrap();
    let id = read_json(res).await["message_id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app
        .clone()
        .oneshot(post_json(
            "/update-feedback",
            json!({ "id": id, "feedback": "positive", "sessionId": "sess-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = read_json(res).await;
    assert_eq!(v, json!({ "messageId": id, "feedback": "positive" }));

    // unknown id in a known session
    let res = app
        .clone()
        .oneshot(post_json(
            "/update-feedback",
            json!({ "id": "missing", "feedback": "negative", "sessionId": "sess-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["error"], "NOT_FOUND");

    // right id, wrong session
    let res = app
        .clone()
        .oneshot(post_json(
            "/update-feedback",
            json!({ "id": id, "feedback": "negative", "sessionId": "sess-2" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["error"], "NOT_FOUND");

    // the rejected updates left the stored label alone
    let stored = store.get_turn("sess-1", &id).await.unwrap().unwrap();
    assert_eq!(stored.feedback, Some(Feedback::Positive));
    assert!(store.get_turn("sess-2", &id).await.unwrap().is_none());
    assert!(store.get_turn("sess-1", "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_feedback_label_is_bad_request() {
    let res = app(Mode::Ok)
        .oneshot(post_json(
            "/update-feedback",
            json!({ "id": "x", "feedback": "meh", "sessionId": "s" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_or_incomplete_bodies_are_bad_requests() {
    let res = app(Mode::Ok)
        .oneshot(post_json("/chat", json!({ "message": "hi" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app(Mode::Ok).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app(Mode::Ok)
        .oneshot(post_json(
            "/chat",
            json!({ "message": "  ", "session_id": "s", "user_id": "u" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_and_storage_failures_map_to_distinct_codes() {
    let cases = [
        (Mode::SearchDown, StatusCode::BAD_GATEWAY, "SEARCH_UPSTREAM_ERROR"),
        (Mode::LlmDown, StatusCode::BAD_GATEWAY, "COMPLETION_UPSTREAM_ERROR"),
        (Mode::StoreDown, StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    ];

    for (mode, status, code) in cases {
        let res = app(mode).oneshot(post_json("/chat", chat_body())).await.unwrap();
        assert_eq!(res.status(), status, "{code}");
        let v = read_json(res).await;
        assert_eq!(v["error"], code);
        assert!(v["message"].as_str().unwrap().len() > 0);
    }
}

#[tokio::test]
async fn new_session_ids_are_fresh_uuids() {
    let app = app(Mode::Ok);
    let mut seen = Vec::new();
    for _ in 0..3 {
        let res = app
            .clone()
            .oneshot(Request::get("/session/new").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let id = read_json(res).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(id.len(), 36);
        assert!(!seen.contains(&id));
        seen.push(id);
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let res = app(Mode::StoreDown)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = read_json(res).await;
    assert_eq!(v["status"], "healthy");
    assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let req = Request::get("/")
        .header("x-request-id", "trace-abc")
        .body(Body::empty())
        .unwrap();
    let res = app(Mode::Ok).oneshot(req).await.unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-abc");
}

#[tokio::test]
async fn cors_echoes_only_allowed_origins() {
    let app = app_with(Mode::Ok, vec!["https://portal.example.com".into()]);

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let res = app
        .clone()
        .oneshot(preflight("https://portal.example.com"))
        .await
        .unwrap();
    let h = res.headers();
    assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://portal.example.com");
    assert_eq!(h[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let res = app.oneshot(preflight("https://evil.example.net")).await.unwrap();
    assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn wildcard_cors_allows_any_origin() {
    let req = Request::get("/")
        .header(header::ORIGIN, "https://anywhere.example.org")
        .body(Body::empty())
        .unwrap();
    let res = app(Mode::Ok).oneshot(req).await.unwrap();
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
