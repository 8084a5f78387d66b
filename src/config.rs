//! Application configuration.
//!
//! [`AppConfig`] is the serialized form, read from JSON with every field
//! optional. [`AppConfig::settings`] validates it into [`Settings`], which
//! carries domain types ready for the services.

use crate::task::domain::{Category, StorePath, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Sub-path holding one subtree per user.
pub const DEFAULT_USERS_PATH: &str = "users";
/// Key code that confirms a new task (Enter).
pub const DEFAULT_CONFIRM_KEY: u32 = 13;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid configuration JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value failed validation.
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Validation message.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Serialized configuration.
///
/// # Examples
///
/// ```
/// use taskpad::config::AppConfig;
///
/// # fn main() -> Result<(), taskpad::config::ConfigError> {
/// let config = AppConfig::from_json(r#"{ "confirm_key": 10 }"#)?;
/// assert_eq!(config.confirm_key, 10);
/// assert_eq!(config.default_category, "incomplete");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Sub-path under the store root where user subtrees live.
    pub users_path: String,
    /// Category bound to the displayed list after login.
    pub default_category: String,
    /// Key code that confirms adding a task.
    pub confirm_key: u32,
    /// Buffered session events per subscriber.
    pub event_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users_path: DEFAULT_USERS_PATH.to_owned(),
            default_category: Category::incomplete().as_str().to_owned(),
            confirm_key: DEFAULT_CONFIRM_KEY,
            event_capacity: crate::session::services::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Parses configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first invalid field.
    pub fn settings(&self) -> ConfigResult<Settings> {
        let users_root =
            StorePath::parse(&self.users_path).map_err(|err| invalid("users_path", &err))?;
        let default_category = Category::new(self.default_category.as_str())
            .map_err(|err| invalid("default_category", &err))?;
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_capacity",
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(Settings {
            users_root,
            default_category,
            confirm_key: self.confirm_key,
            event_capacity: self.event_capacity,
        })
    }
}

fn invalid(field: &'static str, err: &TaskDomainError) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: err.to_string(),
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path under which user subtrees live.
    pub users_root: StorePath,
    /// Category bound to the displayed list after login.
    pub default_category: Category,
    /// Key code that confirms adding a task.
    pub confirm_key: u32,
    /// Buffered session events per subscriber, read by
    /// [`SessionGateway::with_settings`](crate::session::services::SessionGateway::with_settings).
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            users_root: StorePath::root()
                .child(DEFAULT_USERS_PATH)
                .unwrap_or_default(),
            default_category: Category::incomplete(),
            confirm_key: DEFAULT_CONFIRM_KEY,
            event_capacity: crate::session::services::DEFAULT_EVENT_CAPACITY,
        }
    }
}
