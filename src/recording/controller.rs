use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ResolvedStorage, StorageConfig};
use crate::egress::{
    EgressClient, EgressInfo, EgressStatus, EncodedFileOutput, S3Upload, StartRoomCompositeRequest,
};
use crate::error::RecorderError;

/// Result of a start request.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub egress_id: String,
    pub status: EgressStatus,
}

/// Result of a stop request. `message` and `error` are set when the job had
/// already reached a terminal state before we asked.
#[derive(Debug, Clone)]
pub struct StopOutcome {
    pub egress_id: String,
    pub status: EgressStatus,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// What the status probe reports for a room.
#[derive(Debug, Clone)]
pub struct RoomRecordingStatus {
    pub is_recording: bool,
    pub active_egress: Option<EgressInfo>,
}

/// Orchestrates room recordings against the external egress service.
///
/// The service is the sole source of truth; nothing is cached here. The one
/// piece of local state is a monotonic millisecond counter so two starts in
/// the same process never produce the same output path.
pub struct RecordingController {
    client: Arc<dyn EgressClient>,
    storage: StorageConfig,
    last_path_millis: AtomicI64,
}

impl RecordingController {
    pub fn new(client: Arc<dyn EgressClient>, storage: StorageConfig) -> Self {
        Self {
            client,
            storage,
            last_path_millis: AtomicI64::new(0),
        }
    }

    /// Start a room-composite MP4 recording of all participants, uploaded to
    /// the configured bucket. Storage credentials are validated before the
    /// egress service is contacted.
    pub async fn start(&self, room: &str) -> Result<StartOutcome, RecorderError> {
        let storage = self.storage.resolve()?;

        let filepath = self.output_path(room);
        info!("starting recording for room={} path={}", room, filepath);

        let request = StartRoomCompositeRequest {
            room_name: room.to_string(),
            layout: "grid".to_string(),
            audio_only: false,
            file_outputs: vec![file_output(filepath, &storage)],
        };

        let egress = self.client.start_room_composite(&request).await?;
        info!(
            "recording started: egress={} status={:?}",
            egress.egress_id, egress.status
        );

        Ok(StartOutcome {
            egress_id: egress.egress_id,
            status: egress.status,
        })
    }

    /// Stop a recording. The job's current status is probed first: a job
    /// already in a terminal state is reported as success with that status
    /// and the stop RPC is never issued, so the caller never sees a
    /// "cannot stop already-stopped recording" error. The status may change
    /// between probe and stop; that window is accepted.
    pub async fn stop(&self, egress_id: &str) -> Result<StopOutcome, RecorderError> {
        let current = self.client.get_egress(egress_id).await?;

        if current.status.is_terminal() {
            warn!(
                "stop requested for terminal egress={} status={:?}",
                egress_id, current.status
            );
            let message = match current.status {
                EgressStatus::Failed => "Recording failed",
                _ => "Recording already stopped",
            };
            return Ok(StopOutcome {
                egress_id: egress_id.to_string(),
                status: current.status,
                message: Some(message.to_string()),
                error: current.error,
            });
        }

        let stopped = self.client.stop_egress(egress_id).await?;
        info!(
            "recording stopped: egress={} status={:?}",
            egress_id, stopped.status
        );

        Ok(StopOutcome {
            egress_id: egress_id.to_string(),
            status: stopped.status,
            message: None,
            error: stopped.error,
        })
    }

    /// Whether any egress job for the room is in progress. The first
    /// in-progress job in service order wins; the service does not enforce
    /// one egress per room, the probe only presents it that way.
    pub async fn status(&self, room: &str) -> Result<RoomRecordingStatus, RecorderError> {
        let jobs = self.client.list_room_egress(room).await?;
        let active = jobs.into_iter().find(|job| job.status.is_in_progress());

        Ok(RoomRecordingStatus {
            is_recording: active.is_some(),
            active_egress: active,
        })
    }

    /// `recordings/{room}-{epoch-millis}.mp4`, with the millis bumped past
    /// the previous value when two starts land in the same millisecond.
    fn output_path(&self, room: &str) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last_path_millis.load(Ordering::Relaxed);
        let millis = loop {
            let candidate = now.max(prev + 1);
            match self.last_path_millis.compare_exchange(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(observed) => prev = observed,
            }
        };
        format!("recordings/{}-{}.mp4", room, millis)
    }
}

fn file_output(filepath: String, storage: &ResolvedStorage) -> EncodedFileOutput {
    EncodedFileOutput {
        file_type: "MP4".to_string(),
        filepath,
        s3: S3Upload {
            access_key: storage.access_key.clone(),
            secret: storage.secret_key.clone(),
            bucket: storage.bucket.clone(),
            endpoint: format!("https://{}.r2.cloudflarestorage.com", storage.account_id),
            region: "auto".to_string(),
            force_path_style: true,
        },
    }
}
