//! GET /session/new — hands out a fresh session identifier.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
}

pub async fn new_session_route() -> Json<NewSessionResponse> {
    Json(NewSessionResponse {
        session_id: services::uuid::new_session_id(),
    })
}
