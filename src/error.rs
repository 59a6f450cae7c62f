use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for the recording control surface.
///
/// Three failure classes exist and nothing else: a required credential is
/// missing from configuration, the caller omitted a required identifier, or
/// the upstream room/egress service failed. Every error becomes a JSON body;
/// none crash the process and none are retried.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Required credential/environment value missing. Detected before any
    /// network call is made.
    #[error("server misconfigured: {0}")]
    Config(&'static str),

    /// Required identifier missing from the request.
    #[error("{0}")]
    MissingInput(&'static str),

    /// The room/egress service rejected or failed the call. The upstream
    /// message is passed through verbatim.
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for RecorderError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecorderError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RecorderError::MissingInput(_) => StatusCode::BAD_REQUEST,
            RecorderError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_maps_to_500() {
        let response = RecorderError::Config("storage bucket not configured").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_input_maps_to_400() {
        let response = RecorderError::MissingInput("room is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_502() {
        let response = RecorderError::Upstream("quota exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_message_passes_through_verbatim() {
        let err = RecorderError::Upstream("room not found: demo-room".into());
        assert_eq!(err.to_string(), "room not found: demo-room");
    }
}
