//! The seam between the homeserver and the encryption policy
//!
//! A homeserver calls into the filter at two points: once when a room is
//! created, and for every state event submitted to an existing room.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use matryx_e2ee_entity::types::CreateRoomRequest;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::room::{Verdict, check_event_allowed, preprocess_room_creation};

/// Third-party event rules a homeserver consults before admitting events
pub trait ThirdPartyEventRules: Send + Sync {
    /// Rewrite a `createRoom` body before the room is built
    fn on_create_room(
        &self,
        requester: &str,
        is_requester_admin: bool,
        request: CreateRoomRequest,
    ) -> Result<CreateRoomRequest, FilterError>;

    /// Decide whether a state event may enter its room
    fn check_event_allowed(&self, event: &Value) -> Verdict;
}

/// Rules that keep rooms unencrypted for the configured servers
#[derive(Debug, Clone)]
pub struct EncryptedRoomFilter {
    config: Arc<FilterConfig>,
}

impl EncryptedRoomFilter {
    pub fn new(config: Arc<FilterConfig>) -> Self {
        info!("Registered custom rule filter: EncryptedRoomFilter");
        Self { config }
    }
}

impl ThirdPartyEventRules for EncryptedRoomFilter {
    fn on_create_room(
        &self,
        requester: &str,
        is_requester_admin: bool,
        request: CreateRoomRequest,
    ) -> Result<CreateRoomRequest, FilterError> {
        preprocess_room_creation(&self.config, requester, is_requester_admin, request)
    }

    fn check_event_allowed(&self, event: &Value) -> Verdict {
        check_event_allowed(&self.config, event)
    }
}
