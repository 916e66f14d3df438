#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Matrix event and request types consumed by the E2EE room filter

pub mod types;

pub use types::*;
