pub mod check_event_allowed;
pub mod config;
pub mod on_create_room;
