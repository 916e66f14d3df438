use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use matryx_e2ee_entity::types::{ProposedStateEvent, event_type::ROOM_ENCRYPTION};

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::utils::matrix_identifiers::{room_server_name, user_server_name};

pub const REQUESTER_DOMAIN_DENIED: &str = "encryption not allowed: requester domain denied";
pub const ROOM_DOMAIN_DENIED: &str = "encryption not allowed: room domain denied";
pub const PROCESSING_ERROR: &str = "processing error";

/// Admission decision for a single state event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Deny(String),
}

impl Verdict {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

/// Decide whether a raw event as received from the homeserver may be admitted
///
/// Only `m.room.encryption` events are constrained; anything else, including
/// an event with no usable `type`, is allowed. An encryption event that does
/// not parse is denied.
pub fn check_event_allowed(config: &FilterConfig, event: &Value) -> Verdict {
    if event.get("type").and_then(Value::as_str) != Some(ROOM_ENCRYPTION) {
        return Verdict::Allow;
    }

    match serde_json::from_value::<ProposedStateEvent>(event.clone()) {
        Ok(event) => evaluate_state_event(config, &event),
        Err(e) => {
            warn!("Denied encryption for unparseable event: {}", e);
            Verdict::deny(PROCESSING_ERROR)
        }
    }
}

/// Evaluate a state event against the encryption deny-lists
///
/// The sender's server name is checked before the room's; the first match
/// decides. Missing or malformed `sender`/`room_id` fail closed.
pub fn evaluate_state_event(config: &FilterConfig, event: &ProposedStateEvent) -> Verdict {
    if !event.is_type(ROOM_ENCRYPTION) {
        return Verdict::Allow;
    }

    let room_id = event.room_id.as_deref().unwrap_or("<unknown>");

    let (user_server, room_server) = match encryption_domains(event) {
        Ok(domains) => domains,
        Err(e) => {
            warn!(
                "Denied encryption for {} because the event could not be processed: {}",
                room_id, e
            );
            return Verdict::deny(PROCESSING_ERROR);
        }
    };

    if config.denies_user_domain(user_server) {
        warn!("Denied encryption for {} because of requester {}", room_id, user_server);
        return Verdict::deny(REQUESTER_DOMAIN_DENIED);
    }

    if config.denies_room_domain(room_server) {
        warn!("Denied encryption for {} because of room server {}", room_id, room_server);
        return Verdict::deny(ROOM_DOMAIN_DENIED);
    }

    debug!("Allowed encryption for {} requested from {}", room_id, user_server);
    Verdict::Allow
}

fn encryption_domains(event: &ProposedStateEvent) -> Result<(&str, &str), FilterError> {
    let sender = event.sender.as_deref().ok_or(FilterError::MissingField("sender"))?;
    let room_id = event.room_id.as_deref().ok_or(FilterError::MissingField("room_id"))?;

    Ok((user_server_name(sender)?, room_server_name(room_id)?))
}
