pub mod create_room_request;
pub mod event_type;
pub mod power_levels;
pub mod state_event;

pub use create_room_request::CreateRoomRequest;
pub use power_levels::{CREATOR_POWER_LEVEL, PowerLevelsContent, default_event_levels};
pub use state_event::{InitialStateEvent, ProposedStateEvent};
