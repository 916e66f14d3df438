use serde_json::Value;
use tracing::{debug, info, warn};

use matryx_e2ee_entity::types::{
    CreateRoomRequest,
    InitialStateEvent,
    event_type::{ROOM_ENCRYPTION, ROOM_POWER_LEVELS, is_stripped_at_creation},
};

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::room::power_levels::synthesize_power_levels;
use crate::utils::matrix_identifiers::user_server_name;

/// Rewrite a room creation request so the room starts unencrypted and stays so
///
/// Every `m.room.encryption` and `m.room.power_levels` entry is removed from
/// `initial_state`; the remaining entries keep their relative order. A
/// synthesized `m.room.power_levels` event is appended whose encryption
/// threshold no current member reaches. With `patch_power_levels` enabled the
/// last client-supplied power levels event seeds the synthesis.
///
/// # Arguments
/// * `config` - filter configuration
/// * `creator` - user ID of the requester creating the room
/// * `is_admin` - whether the requester is a server admin
/// * `request` - the client's `createRoom` body
///
/// # Errors
/// * `FilterError::MalformedIdentifier` - `creator` is not a user ID
/// * `FilterError::MissingField` - an `initial_state` entry has an empty `type`
/// * `FilterError::InvalidPowerLevels` - the seed power levels are malformed
pub fn preprocess_room_creation(
    config: &FilterConfig,
    creator: &str,
    is_admin: bool,
    mut request: CreateRoomRequest,
) -> Result<CreateRoomRequest, FilterError> {
    user_server_name(creator)?;

    if request.initial_state.iter().any(|event| event.event_type.is_empty()) {
        return Err(FilterError::MissingField("type"));
    }

    debug!(
        "Filtering room creation by {} (admin: {}) with {} initial state events",
        creator,
        is_admin,
        request.initial_state.len()
    );

    let (removed, mut kept): (Vec<InitialStateEvent>, Vec<InitialStateEvent>) = request
        .initial_state
        .drain(..)
        .partition(|event| is_stripped_at_creation(&event.event_type));

    let stripped_encryption = removed.iter().filter(|e| e.event_type == ROOM_ENCRYPTION).count();
    if stripped_encryption > 0 {
        info!("Stripped away encryption request from {}", request.display_name());
    }

    let seed = removed
        .into_iter()
        .rev()
        .find(|event| event.event_type == ROOM_POWER_LEVELS)
        .map(|event| event.content);

    let seed = match seed {
        Some(content) if config.patch_power_levels => Some(content),
        Some(_) => {
            info!(
                "Replaced client-supplied power levels in {} (patching disabled)",
                request.display_name()
            );
            None
        }
        None => None,
    };

    if scrub_encryption_override(&mut request.power_level_content_override) {
        warn!(
            "Removed {} from power_level_content_override of {}",
            ROOM_ENCRYPTION,
            request.display_name()
        );
    }

    let power_levels = synthesize_power_levels(seed, creator)?;
    let power_levels_event = InitialStateEvent::power_levels(&power_levels)
        .map_err(|e| FilterError::InvalidPowerLevels(e.to_string()))?;

    kept.push(power_levels_event);
    request.initial_state = kept;
    Ok(request)
}

/// Drop an `m.room.encryption` entry from the request's power level override,
/// which would otherwise undercut the synthesized threshold
fn scrub_encryption_override(power_level_override: &mut Option<Value>) -> bool {
    power_level_override
        .as_mut()
        .and_then(|content| content.get_mut("events"))
        .and_then(Value::as_object_mut)
        .is_some_and(|events| events.remove(ROOM_ENCRYPTION).is_some())
}
