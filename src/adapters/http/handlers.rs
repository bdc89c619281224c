//! HTTP handlers for the conversation endpoints.
//!
//! These handlers connect axum routes to application layer command/query handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::str::FromStr;

use crate::application::handlers::admin::{
    ClearSessionCommand, ClearSessionHandler, GetSessionError, GetSessionHandler, GetSessionQuery,
};
use crate::application::handlers::turn::{
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler,
};
use crate::domain::foundation::{CustomerId, Intent, SessionId};
use crate::domain::journey::JourneyRegistry;
use crate::domain::session::ConversationSession;
use crate::ports::{Extractor, SessionStore};

use super::dto::{
    ClearSessionResponse, ErrorResponse, HealthResponse, SessionStateResponse, TurnRequest,
    TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// The turn handler is built once so its per-conversation locks span
/// requests; admin handlers are cheap and built per call.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SessionStore>,
    turn_handler: Arc<ProcessTurnHandler>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        extractor: Arc<dyn Extractor>,
        journeys: Arc<JourneyRegistry>,
        extraction_timeout: Duration,
    ) -> Self {
        let turn_handler = Arc::new(
            ProcessTurnHandler::new(store.clone(), extractor, journeys)
                .with_extraction_timeout(extraction_timeout),
        );
        Self {
            store,
            turn_handler,
        }
    }

    pub fn turn_handler(&self) -> Arc<ProcessTurnHandler> {
        self.turn_handler.clone()
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.store.clone())
    }

    pub fn clear_session_handler(&self) -> ClearSessionHandler {
        ClearSessionHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Process one conversation turn
///
/// POST /conversations/turns
pub async fn process_turn(
    State(app_state): State<AppState>,
    Json(req): Json<TurnRequest>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let customer_id = CustomerId::new(req.customer_id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
    })?;

    let intent = Intent::new(req.intent).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
    })?;

    if req.query.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Query cannot be empty")),
        ));
    }

    let cmd = ProcessTurnCommand {
        customer_id,
        intent,
        utterance: req.query,
        channel: req.options.and_then(|o| o.channel),
    };

    let handler = app_state.turn_handler();
    let result = handler.handle(cmd).await.map_err(|e| match e {
        ProcessTurnError::UnknownIntent(intent) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Journey", intent.as_str())),
        ),
        ProcessTurnError::Store(msg) | ProcessTurnError::Orchestration(msg) => {
            tracing::error!(error = %msg, "turn processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Turn processing failed")),
            )
        }
    })?;

    let response = TurnResponse {
        answer: result.reply,
        conversation_id: result.session_id.to_string(),
        intent: result.session.intent.to_string(),
        status: result.session.status.to_string(),
        conversation_history: result.session.history.clone(),
        current_stage: result.session.current_stage_id.to_string(),
        collected_data: result.session.collected_data.clone(),
    };

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((StatusCode::OK, Json(response)))
}

/// Fetch raw session state for diagnostics
///
/// GET /sessions/{session_id}
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let session_id = SessionId::from_str(&session_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session_id format")),
        )
    })?;

    let handler = app_state.get_session_handler();
    let session = handler
        .handle(GetSessionQuery { session_id })
        .await
        .map_err(|e| match e {
            GetSessionError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found("Session", &id.to_string())),
            ),
            GetSessionError::Store(msg) => {
                tracing::error!(error = %msg, "session lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal("Session lookup failed")),
                )
            }
        })?;

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((StatusCode::OK, Json(to_state_response(session))))
}

/// Clear all stored state for a session
///
/// DELETE /sessions/{session_id}
pub async fn clear_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let session_id = SessionId::from_str(&session_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session_id format")),
        )
    })?;

    let handler = app_state.clear_session_handler();
    handler
        .handle(ClearSessionCommand { session_id })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session clear failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Session clear failed")),
            )
        })?;

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((
        StatusCode::OK,
        Json(ClearSessionResponse {
            message: format!("Session {} cleared", session_id),
        }),
    ))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

fn to_state_response(session: ConversationSession) -> SessionStateResponse {
    SessionStateResponse {
        session_id: session.session_id.to_string(),
        customer_id: session.customer_id.to_string(),
        intent: session.intent.to_string(),
        status: session.status.to_string(),
        current_stage: session.current_stage_id.to_string(),
        collected_data: session.collected_data,
        history: session.history,
    }
}
