pub mod create_room;
pub mod encryption_policy;
pub mod power_levels;

pub use create_room::*;
pub use encryption_policy::*;
pub use power_levels::*;
