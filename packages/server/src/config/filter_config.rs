use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::utils::matrix_identifiers::is_valid_server_name;

static FILTER_CONFIG: OnceLock<FilterConfig> = OnceLock::new();

/// Deny-lists and behavior switches of the encryption filter
///
/// Loaded once at process start and never mutated afterwards. Absent keys
/// default to empty lists, which deny nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Encryption is refused when the sender's server name is listed here
    pub deny_encryption_for_users_of: Vec<String>,
    /// Encryption is refused when the room's server name is listed here
    pub deny_encryption_for_rooms_of: Vec<String>,
    /// Derive the creation-time power levels from a client-supplied
    /// `m.room.power_levels` event instead of always building fresh ones
    pub patch_power_levels: bool,
}

/// Module block as it appears in a homeserver config file
#[derive(Debug, Deserialize)]
struct ModuleBlock {
    #[serde(default)]
    module: Option<String>,
    config: FilterConfig,
}

impl FilterConfig {
    pub fn new(
        deny_encryption_for_users_of: Vec<String>,
        deny_encryption_for_rooms_of: Vec<String>,
        patch_power_levels: bool,
    ) -> Self {
        Self { deny_encryption_for_users_of, deny_encryption_for_rooms_of, patch_power_levels }
    }

    /// Parse the filter configuration from YAML
    ///
    /// Accepts either the bare `config` mapping or the whole module block:
    ///
    /// ```yaml
    /// module: "matryx_e2ee_filter.EncryptedRoomFilter"
    /// config:
    ///   deny_encryption_for_users_of: ['example.org']
    ///   deny_encryption_for_rooms_of: ['example.org']
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(FilterConfig::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(source)
            .map_err(|e| ConfigError::InvalidFormat(format!("YAML parse error: {}", e)))?;

        let config = if value.get("config").is_some() {
            let block: ModuleBlock = serde_yaml::from_value(value)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
            if let Some(module) = &block.module {
                info!("Loading filter configuration for module {}", module);
            }
            block.config
        } else if value.is_null() {
            FilterConfig::default()
        } else {
            serde_yaml::from_value(value)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Read a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&source)
    }

    /// Build the configuration from the process environment
    ///
    /// `E2EE_FILTER_CONFIG` names a YAML file and takes precedence; otherwise
    /// the comma-separated `E2EE_DENY_ENCRYPTION_FOR_USERS_OF` and
    /// `E2EE_DENY_ENCRYPTION_FOR_ROOMS_OF` lists and the
    /// `E2EE_PATCH_POWER_LEVELS` flag are read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from variables resolved through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("E2EE_FILTER_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        let patch_power_levels = match lookup("E2EE_PATCH_POWER_LEVELS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::InvalidFormat(format!("E2EE_PATCH_POWER_LEVELS={}", raw))
            })?,
            None => false,
        };

        let config = FilterConfig {
            deny_encryption_for_users_of: domain_list(
                lookup("E2EE_DENY_ENCRYPTION_FOR_USERS_OF").as_deref(),
            ),
            deny_encryption_for_rooms_of: domain_list(
                lookup("E2EE_DENY_ENCRYPTION_FOR_ROOMS_OF").as_deref(),
            ),
            patch_power_levels,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject deny-list entries that cannot be a server name
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self
            .deny_encryption_for_users_of
            .iter()
            .chain(&self.deny_encryption_for_rooms_of);
        for domain in entries {
            if !is_valid_server_name(domain) {
                return Err(ConfigError::InvalidFormat(format!(
                    "deny-list entry is not a server name: '{}'",
                    domain
                )));
            }
        }
        Ok(())
    }

    pub fn denies_user_domain(&self, server_name: &str) -> bool {
        self.deny_encryption_for_users_of.iter().any(|d| d == server_name)
    }

    pub fn denies_room_domain(&self, server_name: &str) -> bool {
        self.deny_encryption_for_rooms_of.iter().any(|d| d == server_name)
    }

    /// Install the process-wide configuration, loading it from the environment
    pub fn init() -> Result<&'static FilterConfig, ConfigError> {
        if let Some(config) = FILTER_CONFIG.get() {
            return Ok(config);
        }

        let config = Self::from_env()?;
        if config.deny_encryption_for_users_of.is_empty()
            && config.deny_encryption_for_rooms_of.is_empty()
        {
            warn!("No deny-lists configured, encryption will only be stripped at room creation");
        }

        info!(
            "Deny lists: users of {:?}; rooms of {:?}; patch_power_levels={}",
            config.deny_encryption_for_users_of,
            config.deny_encryption_for_rooms_of,
            config.patch_power_levels
        );
        Ok(FILTER_CONFIG.get_or_init(|| config))
    }
}

/// Split a comma-separated list, skipping blank entries
fn domain_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
    #[error("Unable to read configuration file: {0}")]
    Unreadable(String),
}
