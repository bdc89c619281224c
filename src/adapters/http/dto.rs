//! HTTP DTOs for the conversation endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::session::Turn;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to process one conversation turn.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub customer_id: String,
    pub intent: String,
    pub query: String,
    #[serde(default)]
    pub options: Option<TurnOptions>,
}

/// Advisory options attached to a turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnOptions {
    /// Communication channel hint (e.g. "WHATSAPP"). Never alters
    /// orchestration.
    #[serde(default)]
    pub channel: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a processed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub answer: String,
    pub conversation_id: String,
    pub intent: String,
    pub status: String,
    pub conversation_history: Vec<Turn>,
    pub current_stage: String,
    pub collected_data: HashMap<String, serde_json::Value>,
}

/// Response for the diagnostic session lookup.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStateResponse {
    pub session_id: String,
    pub customer_id: String,
    pub intent: String,
    pub status: String,
    pub current_stage: String,
    pub collected_data: HashMap<String, serde_json::Value>,
    pub history: Vec<Turn>,
}

/// Response for successful session clearing.
#[derive(Debug, Clone, Serialize)]
pub struct ClearSessionResponse {
    pub message: String,
}

/// Liveness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
