//! Chat endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use moc_protocol::{MessageRequest, MessageResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/message: process one user message and return the reply.
///
/// An empty `message` is still a turn; the assistant answers with a
/// clarifying question.
pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    if req.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }

    let response = state.chat.process_turn(&req.message, &req.user_id).await;
    Ok(Json(MessageResponse { response }))
}
