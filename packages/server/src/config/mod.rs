pub mod filter_config;

pub use filter_config::{ConfigError, FilterConfig};
