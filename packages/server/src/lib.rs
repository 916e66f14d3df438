#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Homeserver policy filter that keeps rooms unencrypted
//!
//! Room creation requests lose any `m.room.encryption` initial state and get
//! power levels under which no member can enable encryption later. State
//! events that would enable encryption are refused when the sender's or the
//! room's server is on a configured deny-list.

pub mod _matryx;
pub mod config;
pub mod error;
pub mod room;
pub mod router;
pub mod rules;
pub mod state;
pub mod utils;

pub use crate::config::FilterConfig;
pub use crate::room::Verdict;
pub use crate::router::create_router;
pub use crate::rules::{EncryptedRoomFilter, ThirdPartyEventRules};
pub use crate::state::AppState;
