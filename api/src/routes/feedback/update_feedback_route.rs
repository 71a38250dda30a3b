//! POST /update-feedback — attaches a verdict to a stored reply.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use chat_pipeline::FeedbackInput;
use history_store::Feedback;
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id_of,
    routes::feedback::feedback_request::{FeedbackRequest, FeedbackResponse},
};

pub async fn update_feedback_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let Json(body) = payload?;

    debug!(
        request_id = %request_id_of(&headers),
        session_id = %body.session_id,
        id = %body.id,
        feedback = %body.feedback,
        "update_feedback_route: start"
    );

    let feedback: Feedback = body.feedback.trim().parse().map_err(AppError::BadRequest)?;

    let turn = state
        .pipeline
        .submit_feedback(FeedbackInput {
            id: body.id,
            feedback,
            session_id: body.session_id,
        })
        .await?;

    Ok(Json(FeedbackResponse {
        message_id: turn.id,
        feedback,
    }))
}
