//! Matrix state event type identifiers used by the encryption filter

/// `m.room.encryption` - enables end-to-end encryption for a room
pub const ROOM_ENCRYPTION: &str = "m.room.encryption";

/// `m.room.power_levels` - per-user and per-action privilege thresholds
pub const ROOM_POWER_LEVELS: &str = "m.room.power_levels";

pub const ROOM_NAME: &str = "m.room.name";
pub const ROOM_HISTORY_VISIBILITY: &str = "m.room.history_visibility";
pub const ROOM_CANONICAL_ALIAS: &str = "m.room.canonical_alias";
pub const ROOM_AVATAR: &str = "m.room.avatar";
pub const ROOM_TOMBSTONE: &str = "m.room.tombstone";
pub const ROOM_SERVER_ACL: &str = "m.room.server_acl";

/// Whether the event type is stripped from a room's `initial_state` at creation
pub fn is_stripped_at_creation(event_type: &str) -> bool {
    matches!(event_type, ROOM_ENCRYPTION | ROOM_POWER_LEVELS)
}
