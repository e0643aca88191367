//! Conversation counters endpoint.

use axum::Json;
use axum::extract::State;
use moc_protocol::StatsSnapshot;

use crate::state::AppState;

/// GET /api/stats: aggregate conversation counters.
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.chat.stats().await)
}
