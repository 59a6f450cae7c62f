use anyhow::Result;
use serde::Deserialize;

use crate::error::RecorderError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub livekit: LiveKitConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Connection details for the room service. Key and secret are optional at
/// load time so a missing credential is reported by the operation that needs
/// it, not as a startup crash.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveKitConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// R2-compatible object storage credentials for recording uploads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub account_id: Option<String>,
}

/// Storage credentials with every required field present.
#[derive(Debug, Clone)]
pub struct ResolvedStorage {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub account_id: String,
}

impl StorageConfig {
    /// Validate that all four credential fields are set. Called before any
    /// egress request is made so a misconfigured deployment fails closed.
    pub fn resolve(&self) -> Result<ResolvedStorage, RecorderError> {
        let access_key = self
            .access_key
            .clone()
            .ok_or(RecorderError::Config("storage access key not configured"))?;
        let secret_key = self
            .secret_key
            .clone()
            .ok_or(RecorderError::Config("storage secret key not configured"))?;
        let bucket = self
            .bucket
            .clone()
            .ok_or(RecorderError::Config("storage bucket not configured"))?;
        let account_id = self
            .account_id
            .clone()
            .ok_or(RecorderError::Config("storage account id not configured"))?;

        Ok(ResolvedStorage {
            access_key,
            secret_key,
            bucket,
            account_id,
        })
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            // RECORDER_LIVEKIT__API_KEY=... overrides [livekit] api_key
            .add_source(config::Environment::with_prefix("RECORDER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
