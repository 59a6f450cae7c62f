use serde::{Deserialize, Serialize};

/// Lifecycle state of an egress job, as a small integer code on the wire.
///
/// A job is created in `Starting`, moves through `Active`, and terminates at
/// `Ended` or `Failed`. The external service owns these transitions; this
/// component only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum EgressStatus {
    Starting = 0,
    Active = 1,
    Ending = 2,
    Ended = 3,
    Failed = 4,
    Aborted = 5,
}

impl EgressStatus {
    /// A recording is underway or about to be.
    pub fn is_in_progress(self) -> bool {
        matches!(self, EgressStatus::Starting | EgressStatus::Active)
    }

    /// No further transition will occur; stop requests are pointless.
    pub fn is_terminal(self) -> bool {
        matches!(self, EgressStatus::Ended | EgressStatus::Failed)
    }
}

impl TryFrom<i32> for EgressStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EgressStatus::Starting),
            1 => Ok(EgressStatus::Active),
            2 => Ok(EgressStatus::Ending),
            3 => Ok(EgressStatus::Ended),
            4 => Ok(EgressStatus::Failed),
            5 => Ok(EgressStatus::Aborted),
            other => Err(format!("unknown egress status code {}", other)),
        }
    }
}

impl From<EgressStatus> for i32 {
    fn from(status: EgressStatus) -> i32 {
        status as i32
    }
}

/// One egress job as reported by the external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EgressInfo {
    pub egress_id: String,
    #[serde(default)]
    pub room_name: String,
    pub status: EgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// S3-compatible upload destination for a recording file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Upload {
    pub access_key: String,
    pub secret: String,
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub force_path_style: bool,
}

/// MP4 file output descriptor for a room-composite egress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFileOutput {
    pub file_type: String,
    pub filepath: String,
    pub s3: S3Upload,
}

/// Request to record all participants of a room into one composite file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoomCompositeRequest {
    pub room_name: String,
    pub layout: String,
    pub audio_only: bool,
    pub file_outputs: Vec<EncodedFileOutput>,
}
