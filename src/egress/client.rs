use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::status::{EgressInfo, StartRoomCompositeRequest};
use crate::config::LiveKitConfig;
use crate::error::RecorderError;
use crate::token::TokenIssuer;

#[derive(Debug, Error)]
pub enum EgressError {
    /// Required room-service credential missing from configuration.
    #[error("server misconfigured: {0}")]
    Config(&'static str),

    /// The request never reached a valid response (network, TLS, decode).
    #[error("egress request failed: {0}")]
    Request(String),

    /// The service answered with an error; its message is kept verbatim.
    #[error("{0}")]
    Api(String),

    /// No egress job with the given ID exists.
    #[error("egress {0} not found")]
    NotFound(String),
}

impl From<EgressError> for RecorderError {
    fn from(err: EgressError) -> Self {
        match err {
            EgressError::Config(msg) => RecorderError::Config(msg),
            other => RecorderError::Upstream(other.to_string()),
        }
    }
}

/// Seam to the external egress service. The HTTP implementation below talks
/// to a live deployment; tests substitute an in-memory mock.
#[async_trait]
pub trait EgressClient: Send + Sync {
    /// Request a room-composite recording. Returns the new job.
    async fn start_room_composite(
        &self,
        req: &StartRoomCompositeRequest,
    ) -> Result<EgressInfo, EgressError>;

    /// All egress jobs the service knows for a room, in service order.
    async fn list_room_egress(&self, room: &str) -> Result<Vec<EgressInfo>, EgressError>;

    /// Current state of one specific egress job.
    async fn get_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError>;

    /// Ask the service to end a job. Not idempotent upstream; callers are
    /// expected to check for terminal states first.
    async fn stop_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEgressRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    room_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    egress_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ListEgressResponse {
    #[serde(default)]
    items: Vec<EgressInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopEgressRequest<'a> {
    egress_id: &'a str,
}

#[derive(Deserialize)]
struct TwirpError {
    msg: Option<String>,
}

/// Twirp client for the room service's egress API. Every call signs a fresh
/// short-lived bearer token carrying the record grant. Single attempt per
/// call; failures propagate to the HTTP boundary unretried.
pub struct HttpEgressClient {
    http: reqwest::Client,
    livekit: LiveKitConfig,
}

impl HttpEgressClient {
    pub fn new(http: reqwest::Client, livekit: LiveKitConfig) -> Self {
        Self { http, livekit }
    }

    fn bearer(&self) -> Result<String, EgressError> {
        let issuer = TokenIssuer::from_config(&self.livekit).map_err(|e| match e {
            RecorderError::Config(msg) => EgressError::Config(msg),
            other => EgressError::Request(other.to_string()),
        })?;
        issuer
            .issue_recorder()
            .map_err(|e| EgressError::Request(e.to_string()))
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/twirp/livekit.Egress/{}",
            http_url(&self.livekit.url),
            method
        )
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, EgressError>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(method);
        debug!("egress call: {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.bearer()?)
            .json(body)
            .send()
            .await
            .map_err(|e| EgressError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwirpError>(&text)
                .ok()
                .and_then(|e| e.msg)
                .unwrap_or(text);
            return Err(EgressError::Api(format!("{} ({})", message, status)));
        }

        response
            .json()
            .await
            .map_err(|e| EgressError::Request(format!("invalid egress response: {}", e)))
    }
}

#[async_trait]
impl EgressClient for HttpEgressClient {
    async fn start_room_composite(
        &self,
        req: &StartRoomCompositeRequest,
    ) -> Result<EgressInfo, EgressError> {
        self.call("StartRoomCompositeEgress", req).await
    }

    async fn list_room_egress(&self, room: &str) -> Result<Vec<EgressInfo>, EgressError> {
        let response: ListEgressResponse = self
            .call(
                "ListEgress",
                &ListEgressRequest {
                    room_name: Some(room),
                    egress_id: None,
                },
            )
            .await?;
        Ok(response.items)
    }

    async fn get_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError> {
        let response: ListEgressResponse = self
            .call(
                "ListEgress",
                &ListEgressRequest {
                    room_name: None,
                    egress_id: Some(egress_id),
                },
            )
            .await?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| EgressError::NotFound(egress_id.to_string()))
    }

    async fn stop_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError> {
        self.call("StopEgress", &StopEgressRequest { egress_id }).await
    }
}

/// The configured server URL is usually a ws(s) signalling URL; the Twirp
/// API lives on the matching http(s) origin.
fn http_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else {
        url.trim_end_matches('/').to_string()
    }
}
