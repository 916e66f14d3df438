use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::event_type::ROOM_POWER_LEVELS;
use crate::types::power_levels::PowerLevelsContent;

/// State event proposed in the `initial_state` of a room creation request
///
/// The room does not exist yet, so there is no `room_id`. `type` is
/// mandatory; a request carrying an entry without it does not deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialStateEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,

    /// Any other keys the client sent, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InitialStateEvent {
    pub fn new(
        event_type: impl Into<String>,
        state_key: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            state_key: Some(state_key.into()),
            content,
            extra: Map::new(),
        }
    }

    /// Build the `m.room.power_levels` state event carrying `content`
    pub fn power_levels(content: &PowerLevelsContent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(ROOM_POWER_LEVELS, "", serde_json::to_value(content)?))
    }
}

/// State event in flight towards an existing room
///
/// Identity fields are optional here: the admission check must be able to
/// see a malformed event in order to reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedStateEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProposedStateEvent {
    pub fn new(event_type: &str, sender: &str, room_id: &str, content: Value) -> Self {
        Self {
            event_type: Some(event_type.to_string()),
            sender: Some(sender.to_string()),
            room_id: Some(room_id.to_string()),
            state_key: Some(String::new()),
            content,
            extra: Map::new(),
        }
    }

    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type.as_deref() == Some(event_type)
    }
}
