//! POST /chat — answers a message with search-augmented generation.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use chat_pipeline::{ChatInput, ChatOutcome};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::request_id::request_id_of,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"How do I reset the device?","session_id":"s-1","user_id":"u-1"}'
/// ```
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;

    debug!(
        request_id = %request_id_of(&headers),
        session_id = %body.session_id,
        message_len = body.message.len(),
        "chat_route: start"
    );

    let ChatOutcome {
        message_id,
        response,
        session_id,
        elapsed_time,
        first_chunk,
        second_chunk,
    } = state
        .pipeline
        .handle_chat(ChatInput {
            message: body.message,
            session_id: body.session_id,
            user_id: body.user_id,
            user_roles: body.user_roles,
        })
        .await?;

    Ok(Json(ChatResponse {
        message_id,
        response,
        session_id,
        elapsed_time,
        first_chunk,
        second_chunk,
    }))
}
