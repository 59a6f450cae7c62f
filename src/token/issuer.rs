use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use sha2::Sha256;
use tracing::debug;

use super::grants::{Claims, VideoGrants};
use crate::config::LiveKitConfig;
use crate::error::RecorderError;

/// Room used when a token request does not name one.
pub const DEFAULT_ROOM: &str = "voice-assistant-room";

/// Token lifetime, fixed at one hour.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// Sign a claim set as an HS256 JWT with the project's API secret.
pub fn sign_jwt(api_secret: &str, claims: &Claims) -> Result<String, RecorderError> {
    let header = serde_json::to_vec(&Header {
        alg: "HS256",
        typ: "JWT",
    })
    .map_err(|e| RecorderError::Upstream(format!("failed to encode token header: {}", e)))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| RecorderError::Upstream(format!("failed to encode token claims: {}", e)))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes())
        .map_err(|e| RecorderError::Upstream(format!("invalid signing key: {}", e)))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// A minted room credential plus the resolved connection parameters the
/// client needs alongside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub room: String,
    pub username: String,
    pub server_url: String,
}

/// Mints short-lived room access tokens. Stateless: every call signs a fresh
/// credential and nothing is recorded locally.
pub struct TokenIssuer {
    api_key: String,
    api_secret: String,
    server_url: String,
}

impl TokenIssuer {
    /// Fails when the API key or secret is absent from configuration. The
    /// check happens here so no handler can mint with partial credentials.
    pub fn from_config(cfg: &LiveKitConfig) -> Result<Self, RecorderError> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or(RecorderError::Config("livekit api key not configured"))?;
        let api_secret = cfg
            .api_secret
            .clone()
            .ok_or(RecorderError::Config("livekit api secret not configured"))?;

        Ok(Self {
            api_key,
            api_secret,
            server_url: cfg.url.clone(),
        })
    }

    /// Issue a participant token for the given room and identity, defaulting
    /// both when absent. Grants always include join, publish, subscribe and
    /// data-publish.
    pub fn issue(
        &self,
        room: Option<String>,
        username: Option<String>,
    ) -> Result<IssuedToken, RecorderError> {
        let room = room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
        let username = username.unwrap_or_else(random_identity);

        debug!("issuing token for room={} identity={}", room, username);

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: self.api_key.clone(),
            sub: Some(username.clone()),
            nbf: now,
            exp: now + TOKEN_TTL_SECS,
            video: VideoGrants::participant(room.clone()),
        };

        let token = sign_jwt(&self.api_secret, &claims)?;

        Ok(IssuedToken {
            token,
            room,
            username,
            server_url: self.server_url.clone(),
        })
    }

    /// Issue a server-to-server token carrying the record grant, used to
    /// authenticate egress API calls.
    pub fn issue_recorder(&self) -> Result<String, RecorderError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: self.api_key.clone(),
            sub: None,
            nbf: now,
            exp: now + TOKEN_TTL_SECS,
            video: VideoGrants::recorder(),
        };
        sign_jwt(&self.api_secret, &claims)
    }
}

/// Generated identity: `user-` plus a 5-character lowercase alphanumeric
/// suffix.
fn random_identity() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| (b as char).to_ascii_lowercase())
        .take(5)
        .collect();
    format!("user-{}", suffix)
}
