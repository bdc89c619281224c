//! Route definitions for the conversation endpoints.

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{clear_session, get_session, health, process_turn, AppState};

/// Create the service router with all endpoints
///
/// # Endpoints
///
/// - `POST /conversations/turns` - Process one conversation turn
/// - `GET /sessions/{session_id}` - Fetch raw session state
/// - `DELETE /sessions/{session_id}` - Clear a session
/// - `GET /health` - Liveness probe
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/conversations/turns", post(process_turn))
        .route("/sessions/:session_id", get(get_session))
        .route("/sessions/:session_id", delete(clear_session))
        .route("/health", get(health))
}
