pub mod client;
pub mod config;
pub mod egress;
pub mod error;
pub mod http;
pub mod recording;
pub mod token;

pub use client::{RecordingToggle, ToggleError, ToggleEvent, ToggleState};
pub use config::{Config, LiveKitConfig, StorageConfig};
pub use egress::{EgressClient, EgressError, EgressInfo, EgressStatus, HttpEgressClient};
pub use error::RecorderError;
pub use http::{create_router, AppState};
pub use recording::{RecordingController, RoomRecordingStatus, StartOutcome, StopOutcome};
pub use token::{TokenIssuer, DEFAULT_ROOM};
