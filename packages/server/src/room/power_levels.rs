use serde_json::Value;
use tracing::{debug, warn};

use matryx_e2ee_entity::types::{
    CREATOR_POWER_LEVEL,
    PowerLevelsContent,
    default_event_levels,
    event_type::ROOM_ENCRYPTION,
};

use crate::error::FilterError;

/// Distance between the highest member level and the level required to
/// send `m.room.encryption`
pub const ENCRYPTION_LEVEL_MARGIN: i64 = 50;

/// Build the power levels a new room starts with
///
/// The level required for `m.room.encryption` is set strictly above the
/// highest level any member holds, so nobody in the room can enable
/// encryption without first being granted more power through a separate
/// `m.room.power_levels` change.
///
/// The highest level is taken over `users` together with `users_default`, so
/// members missing from `users` are covered too: a seed of
/// `{"users_default": 200}` yields a threshold of 250. A seed without `users`
/// lists the creator at 100.
///
/// # Arguments
/// * `seed` - `content` of a client-supplied `m.room.power_levels` event;
///   `None` or a non-object value yields the full default document
/// * `creator` - user ID of the room creator
///
/// # Errors
/// * `FilterError::InvalidPowerLevels` - the seed's level maps are not maps
///   of integers, or the highest level leaves no room above it
pub fn synthesize_power_levels(
    seed: Option<Value>,
    creator: &str,
) -> Result<PowerLevelsContent, FilterError> {
    let mut levels = match seed {
        Some(content @ Value::Object(_)) => PowerLevelsContent::from_value(content)
            .map_err(|e| FilterError::InvalidPowerLevels(e.to_string()))?,
        _ => PowerLevelsContent::new_with_creator(creator),
    };

    if levels.users.is_none() {
        levels.users = Some([(creator.to_string(), CREATOR_POWER_LEVEL)].into_iter().collect());
    }

    if !levels.users.as_ref().is_some_and(|users| users.contains_key(creator)) {
        warn!(
            "Supplied power levels leave out creator {}, who starts at level {}",
            creator,
            levels.user_level(creator)
        );
    }

    let highest = levels.max_user_level();
    let required = highest.checked_add(ENCRYPTION_LEVEL_MARGIN).ok_or_else(|| {
        FilterError::InvalidPowerLevels(format!("user power level {} is out of range", highest))
    })?;

    levels
        .events
        .get_or_insert_with(default_event_levels)
        .insert(ROOM_ENCRYPTION.to_string(), required);

    debug!(
        "Synthesized power levels for creator {}: {} requires level {} (highest member level {})",
        creator, ROOM_ENCRYPTION, required, highest
    );
    Ok(levels)
}
