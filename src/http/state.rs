use std::sync::Arc;

use crate::config::Config;
use crate::egress::EgressClient;
use crate::recording::RecordingController;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<RecordingController>,
}

impl AppState {
    pub fn new(config: Arc<Config>, client: Arc<dyn EgressClient>) -> Self {
        let controller = Arc::new(RecordingController::new(
            client,
            config.storage.clone(),
        ));
        Self { config, controller }
    }
}
