use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::egress::EgressStatus;

/// Tri-state of the recording control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleState {
    /// No recording underway.
    Idle,
    /// A start or stop request is in flight; presses are ignored.
    Busy,
    /// Recording, with the egress ID to stop it with.
    Recording { egress_id: String },
}

/// What a press actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleEvent {
    /// Press arrived while a request was in flight and was dropped.
    Ignored,
    Started {
        egress_id: String,
    },
    /// Recording ended; `status` may be ENDED or FAILED, both clear local
    /// state. `message` carries the server's informational text, if any.
    Stopped {
        status: EgressStatus,
        message: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with an error body; shown to the user as-is.
    #[error("{0}")]
    Server(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBody {
    egress_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopBody {
    status: EgressStatus,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    is_recording: bool,
    active_egress: Option<ActiveEgress>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveEgress {
    egress_id: String,
}

/// Client-side recording toggle backed by the controller's HTTP API.
///
/// Mirrors the UI widget: sync once when mounted, then one press flips
/// between starting and stopping. Presses during an in-flight request are
/// ignored; that is the only concurrency guard, and it only serializes this
/// client's own requests.
pub struct RecordingToggle {
    http: reqwest::Client,
    base_url: String,
    room: String,
    state: ToggleState,
}

impl RecordingToggle {
    pub fn new(base_url: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            room: room.into(),
            state: ToggleState::Idle,
        }
    }

    pub fn state(&self) -> &ToggleState {
        &self.state
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Initial probe: adopt an already-running recording if one exists.
    pub async fn sync(&mut self) -> Result<(), ToggleError> {
        if self.state == ToggleState::Busy {
            return Ok(());
        }

        let url = format!("{}/api/recording?room={}", self.base_url, self.room);
        let body: StatusBody = self.request(self.http.get(&url)).await?;

        self.state = match body.active_egress {
            Some(active) if body.is_recording => ToggleState::Recording {
                egress_id: active.egress_id,
            },
            _ => ToggleState::Idle,
        };
        debug!("toggle synced: {:?}", self.state);
        Ok(())
    }

    /// Flip the recording state. Returns `Ignored` without any request when
    /// one is already in flight.
    pub async fn press(&mut self) -> Result<ToggleEvent, ToggleError> {
        match std::mem::replace(&mut self.state, ToggleState::Busy) {
            ToggleState::Busy => Ok(ToggleEvent::Ignored),
            ToggleState::Idle => self.start().await,
            ToggleState::Recording { egress_id } => self.stop(egress_id).await,
        }
    }

    async fn start(&mut self) -> Result<ToggleEvent, ToggleError> {
        let url = format!("{}/api/recording", self.base_url);
        let result: Result<StartBody, ToggleError> = self
            .request(
                self.http
                    .post(&url)
                    .json(&serde_json::json!({ "room": self.room })),
            )
            .await;

        match result {
            Ok(body) => {
                self.state = ToggleState::Recording {
                    egress_id: body.egress_id.clone(),
                };
                Ok(ToggleEvent::Started {
                    egress_id: body.egress_id,
                })
            }
            Err(err) => {
                // Start failed; nothing is recording.
                self.state = ToggleState::Idle;
                Err(err)
            }
        }
    }

    async fn stop(&mut self, egress_id: String) -> Result<ToggleEvent, ToggleError> {
        let url = format!(
            "{}/api/recording?egressId={}",
            self.base_url, egress_id
        );
        let result: Result<StopBody, ToggleError> = self.request(self.http.delete(&url)).await;

        match result {
            Ok(body) => {
                // ENDED and FAILED are both terminal from here; either way
                // the local state is cleared.
                self.state = ToggleState::Idle;
                Ok(ToggleEvent::Stopped {
                    status: body.status,
                    message: body.message,
                })
            }
            Err(err) => {
                // Keep the egress ID so the user can press again.
                self.state = ToggleState::Recording { egress_id };
                Err(err)
            }
        }
    }

    async fn request<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ToggleError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = builder
            .send()
            .await
            .map_err(|e| ToggleError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ToggleError::Server(message));
        }

        response
            .json()
            .await
            .map_err(|e| ToggleError::Request(format!("invalid response: {}", e)))
    }
}
