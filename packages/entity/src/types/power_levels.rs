use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::types::event_type::{
    ROOM_AVATAR,
    ROOM_CANONICAL_ALIAS,
    ROOM_ENCRYPTION,
    ROOM_HISTORY_VISIBILITY,
    ROOM_NAME,
    ROOM_POWER_LEVELS,
    ROOM_SERVER_ACL,
    ROOM_TOMBSTONE,
};

/// Power level assigned to a room creator
pub const CREATOR_POWER_LEVEL: i64 = 100;

/// Content of an `m.room.power_levels` state event
///
/// Every field is optional so that a user-supplied document survives a
/// round trip unchanged: keys that were absent stay absent, and keys this
/// type does not model (`notifications`, vendor extensions) are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerLevelsContent {
    /// Power levels for specific users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeMap<String, i64>>,

    /// Default power level for users not listed in `users`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_default: Option<i64>,

    /// Power levels required to send specific event types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeMap<String, i64>>,

    /// Default power level required to send message events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_default: Option<i64>,

    /// Default power level required to send state events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_default: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<i64>,

    /// Power level required to import historical messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Default per-event-type thresholds for a freshly created room
pub fn default_event_levels() -> BTreeMap<String, i64> {
    [
        (ROOM_NAME, 50),
        (ROOM_POWER_LEVELS, 100),
        (ROOM_HISTORY_VISIBILITY, 100),
        (ROOM_CANONICAL_ALIAS, 50),
        (ROOM_AVATAR, 50),
        (ROOM_TOMBSTONE, 100),
        (ROOM_SERVER_ACL, 100),
        (ROOM_ENCRYPTION, 100),
    ]
    .into_iter()
    .map(|(event_type, level)| (event_type.to_string(), level))
    .collect()
}

impl PowerLevelsContent {
    /// Full default document with the creator as the sole privileged user
    pub fn new_with_creator(creator_user_id: &str) -> Self {
        let mut users = BTreeMap::new();
        users.insert(creator_user_id.to_string(), CREATOR_POWER_LEVEL);

        Self {
            users: Some(users),
            users_default: Some(0),
            events: Some(default_event_levels()),
            events_default: Some(0),
            state_default: Some(50),
            ban: Some(50),
            kick: Some(50),
            redact: Some(50),
            invite: Some(0),
            historical: Some(100),
            extra: Map::new(),
        }
    }

    /// Parse power level content from a raw event `content` value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Highest level held by any member, counting `users_default` for unlisted ones
    pub fn max_user_level(&self) -> i64 {
        let listed = self.users.iter().flat_map(|users| users.values().copied());
        listed.chain(self.users_default).max().unwrap_or(0)
    }

    /// Get power level for a user
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users
            .as_ref()
            .and_then(|users| users.get(user_id).copied())
            .or(self.users_default)
            .unwrap_or(0)
    }

    /// Explicit level override for an event type, if any
    pub fn event_level(&self, event_type: &str) -> Option<i64> {
        self.events.as_ref()?.get(event_type).copied()
    }

    /// Check if user can send a state event of the given type
    pub fn user_can_send_state(&self, user_id: &str, event_type: &str) -> bool {
        let required = self
            .event_level(event_type)
            .or(self.state_default)
            .unwrap_or(50);
        self.user_level(user_id) >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creator_defaults() {
        let levels = PowerLevelsContent::new_with_creator("@alice:good.org");

        assert_eq!(levels.user_level("@alice:good.org"), 100);
        assert_eq!(levels.user_level("@bob:good.org"), 0);
        assert_eq!(levels.event_level(ROOM_ENCRYPTION), Some(100));
        assert_eq!(levels.invite, Some(0));
        assert_eq!(levels.historical, Some(100));
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({
            "users": {"@alice:x": 100},
            "notifications": {"room": 50}
        });

        let levels = PowerLevelsContent::from_value(raw.clone()).unwrap();
        assert_eq!(levels.extra.get("notifications"), Some(&json!({"room": 50})));
        assert!(levels.events.is_none());
        assert_eq!(serde_json::to_value(&levels).unwrap(), raw);
    }

    #[test]
    fn test_max_user_level_counts_users_default() {
        let levels = PowerLevelsContent::from_value(json!({
            "users": {"@alice:x": 100},
            "users_default": 120
        }))
        .unwrap();
        assert_eq!(levels.max_user_level(), 120);

        let empty = PowerLevelsContent::from_value(json!({"users": {}})).unwrap();
        assert_eq!(empty.max_user_level(), 0);
    }

    #[test]
    fn test_state_permission_uses_override_then_state_default() {
        let levels = PowerLevelsContent::new_with_creator("@alice:x");

        assert!(levels.user_can_send_state("@alice:x", ROOM_ENCRYPTION));
        assert!(!levels.user_can_send_state("@bob:x", "m.room.topic"));
    }

    #[test]
    fn test_non_integer_levels_are_rejected() {
        let result = PowerLevelsContent::from_value(json!({"users": {"@alice:x": "high"}}));
        assert!(result.is_err());
    }
}
