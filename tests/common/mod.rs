#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use room_recorder::egress::{
    EgressClient, EgressError, EgressInfo, EgressStatus, StartRoomCompositeRequest,
};
use room_recorder::{Config, LiveKitConfig, StorageConfig};

/// In-memory egress service double. Jobs are seeded or created by start
/// calls; every RPC is counted so tests can assert what was (not) invoked.
#[derive(Default)]
pub struct MockEgressClient {
    pub jobs: Mutex<Vec<EgressInfo>>,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub start_requests: Mutex<Vec<StartRoomCompositeRequest>>,
    /// When set, start calls fail with this upstream message.
    pub fail_start: Mutex<Option<String>>,
    next_id: AtomicUsize,
}

impl MockEgressClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_jobs(jobs: Vec<EgressInfo>) -> Arc<Self> {
        let client = Self::default();
        *client.jobs.lock().unwrap() = jobs;
        Arc::new(client)
    }

    pub fn job(egress_id: &str, room: &str, status: EgressStatus) -> EgressInfo {
        EgressInfo {
            egress_id: egress_id.to_string(),
            room_name: room.to_string(),
            status,
            error: None,
        }
    }

    pub fn failed_job(egress_id: &str, room: &str, error: &str) -> EgressInfo {
        EgressInfo {
            egress_id: egress_id.to_string(),
            room_name: room.to_string(),
            status: EgressStatus::Failed,
            error: Some(error.to_string()),
        }
    }
}

#[async_trait]
impl EgressClient for MockEgressClient {
    async fn start_room_composite(
        &self,
        req: &StartRoomCompositeRequest,
    ) -> Result<EgressInfo, EgressError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.start_requests.lock().unwrap().push(req.clone());

        if let Some(msg) = self.fail_start.lock().unwrap().clone() {
            return Err(EgressError::Api(msg));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let info = EgressInfo {
            egress_id: format!("EG_{}", n),
            room_name: req.room_name.clone(),
            status: EgressStatus::Starting,
            error: None,
        };
        self.jobs.lock().unwrap().push(info.clone());
        Ok(info)
    }

    async fn list_room_egress(&self, room: &str) -> Result<Vec<EgressInfo>, EgressError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.room_name == room)
            .cloned()
            .collect())
    }

    async fn get_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.egress_id == egress_id)
            .cloned()
            .ok_or_else(|| EgressError::NotFound(egress_id.to_string()))
    }

    async fn stop_egress(&self, egress_id: &str) -> Result<EgressInfo, EgressError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|job| job.egress_id == egress_id)
            .ok_or_else(|| EgressError::NotFound(egress_id.to_string()))?;
        job.status = EgressStatus::Ended;
        Ok(job.clone())
    }
}

pub fn full_storage() -> StorageConfig {
    StorageConfig {
        access_key: Some("test-access-key".into()),
        secret_key: Some("test-secret-key".into()),
        bucket: Some("test-bucket".into()),
        account_id: Some("test-account".into()),
    }
}

pub fn test_config(storage: StorageConfig) -> Config {
    serde_json::from_value(serde_json::json!({
        "service": { "name": "room-recorder", "http": { "bind": "127.0.0.1", "port": 0 } },
        "livekit": {
            "url": "wss://example.livekit.cloud",
            "api_key": "test-key",
            "api_secret": "test-secret",
        },
        "storage": {
            "access_key": storage.access_key,
            "secret_key": storage.secret_key,
            "bucket": storage.bucket,
            "account_id": storage.account_id,
        },
    }))
    .unwrap()
}

pub fn config_without_livekit_credentials() -> Config {
    let mut cfg = test_config(full_storage());
    cfg.livekit = LiveKitConfig {
        url: cfg.livekit.url,
        api_key: None,
        api_secret: None,
    };
    cfg
}
