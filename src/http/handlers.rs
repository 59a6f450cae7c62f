use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::AppState;
use crate::egress::{EgressInfo, EgressStatus};
use crate::error::RecorderError;
use crate::token::TokenIssuer;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    /// Room to join (defaults to the fixed assistant room).
    pub room: Option<String>,

    /// Display identity (random `user-xxxxx` if absent).
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub room: String,
    pub username: String,
    pub server_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StartRecordingRequest {
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingResponse {
    pub success: bool,
    pub egress_id: String,
    pub status: EgressStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopParams {
    pub egress_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecordingResponse {
    pub success: bool,
    pub egress_id: String,
    pub status: EgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStatusResponse {
    pub is_recording: bool,
    pub active_egress: Option<EgressInfo>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/token
/// Mint a room access token for the given (or defaulted) room and identity.
pub async fn issue_token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<TokenResponse>, RecorderError> {
    let issuer = TokenIssuer::from_config(&state.config.livekit)?;
    let issued = issuer.issue(params.room, params.username)?;

    info!("issued token for room={} identity={}", issued.room, issued.username);

    Ok(Json(TokenResponse {
        token: issued.token,
        room: issued.room,
        username: issued.username,
        server_url: issued.server_url,
    }))
}

/// POST /api/recording
/// Start a room-composite recording.
pub async fn start_recording(
    State(state): State<AppState>,
    Json(req): Json<StartRecordingRequest>,
) -> Result<Json<StartRecordingResponse>, RecorderError> {
    let room = req
        .room
        .filter(|r| !r.is_empty())
        .ok_or(RecorderError::MissingInput("room is required"))?;

    let outcome = state.controller.start(&room).await?;

    Ok(Json(StartRecordingResponse {
        success: true,
        egress_id: outcome.egress_id,
        status: outcome.status,
    }))
}

/// DELETE /api/recording?egressId=...
/// Stop a recording. Stopping a job that already ended or failed is a no-op
/// success carrying the terminal status.
pub async fn stop_recording(
    State(state): State<AppState>,
    Query(params): Query<StopParams>,
) -> Result<Json<StopRecordingResponse>, RecorderError> {
    let egress_id = params
        .egress_id
        .filter(|id| !id.is_empty())
        .ok_or(RecorderError::MissingInput("egressId is required"))?;

    let outcome = state.controller.stop(&egress_id).await?;

    Ok(Json(StopRecordingResponse {
        success: true,
        egress_id: outcome.egress_id,
        status: outcome.status,
        message: outcome.message,
        error: outcome.error,
    }))
}

/// GET /api/recording?room=...
/// Report whether any egress job for the room is in progress.
pub async fn recording_status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<RecordingStatusResponse>, RecorderError> {
    let room = params
        .room
        .filter(|r| !r.is_empty())
        .ok_or(RecorderError::MissingInput("room is required"))?;

    let status = state.controller.status(&room).await?;

    Ok(Json(RecordingStatusResponse {
        is_recording: status.is_recording,
        active_egress: status.active_egress,
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
