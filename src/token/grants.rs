use serde::{Deserialize, Serialize};

/// Permission bits embedded in a room access token. Serialized in the
/// camelCase form the room service expects; unset bits are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_join: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_record: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_publish: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_subscribe: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_publish_data: bool,
}

impl VideoGrants {
    /// Full participant grants for joining a named room.
    pub fn participant(room: impl Into<String>) -> Self {
        Self {
            room: Some(room.into()),
            room_join: true,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
            ..Default::default()
        }
    }

    /// Server-side grant used for egress API calls.
    pub fn recorder() -> Self {
        Self {
            room_record: true,
            ..Default::default()
        }
    }
}

/// JWT claim set for a room access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// API key of the issuing project.
    pub iss: String,
    /// Participant identity; absent on server-to-server tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrants,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_grants_are_complete() {
        let grants = VideoGrants::participant("demo-room");
        assert_eq!(grants.room.as_deref(), Some("demo-room"));
        assert!(grants.room_join);
        assert!(grants.can_publish);
        assert!(grants.can_subscribe);
        assert!(grants.can_publish_data);
        assert!(!grants.room_record);
    }

    #[test]
    fn unset_bits_are_omitted_from_json() {
        let json = serde_json::to_string(&VideoGrants::recorder()).unwrap();
        assert_eq!(json, r#"{"roomRecord":true}"#);
    }

    #[test]
    fn grants_serialize_camel_case() {
        let json = serde_json::to_value(VideoGrants::participant("r")).unwrap();
        assert_eq!(json["roomJoin"], true);
        assert_eq!(json["canPublishData"], true);
    }
}
