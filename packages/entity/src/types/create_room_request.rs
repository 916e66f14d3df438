use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::state_event::InitialStateEvent;

/// Body of a `POST /_matrix/client/v3/createRoom` request as seen by the filter
///
/// Only the keys the filter reads or rewrites are modelled; everything else
/// (`preset`, `invite`, `creation_content`, ...) lives in `extra` and is
/// handed back to the homeserver unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub initial_state: Vec<InitialStateEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_level_content_override: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateRoomRequest {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Name of the room for log output, `<unnamed>` when the client set none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_type_is_rejected() {
        let result = CreateRoomRequest::from_value(json!({
            "initial_state": [{"state_key": "", "content": {"name": "x"}}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unmodelled_keys_pass_through() {
        let raw = json!({
            "name": "Team",
            "preset": "private_chat",
            "invite": ["@bob:good.org"],
            "initial_state": [
                {"type": "m.room.guest_access", "state_key": "", "content": {"guest_access": "can_join"}}
            ]
        });

        let request = CreateRoomRequest::from_value(raw.clone()).unwrap();
        assert_eq!(request.display_name(), "Team");
        assert_eq!(request.extra.get("preset"), Some(&json!("private_chat")));
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn test_absent_initial_state_defaults_to_empty() {
        let request = CreateRoomRequest::from_value(json!({})).unwrap();
        assert!(request.initial_state.is_empty());
        assert_eq!(request.display_name(), "<unnamed>");
    }
}
