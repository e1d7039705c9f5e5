//! Runtime configuration for hosts embedding the gradebook core.
//!
//! Values come from the process environment:
//!
//! | Variable              | Meaning                                   | Default               |
//! |-----------------------|-------------------------------------------|-----------------------|
//! | `GRADEBOOK_LOG_LEVEL` | `trace|debug|info|warn|error`             | `default_log_level()` |
//! | `GRADEBOOK_LOG_DIR`   | absolute directory for rolling log files  | file logging disabled |
//! | `GRADEBOOK_DB_PATH`   | local record store file                   | in-memory store       |

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "GRADEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GRADEBOOK_LOG_DIR";
pub const ENV_DB_PATH: &str = "GRADEBOOK_DB_PATH";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    /// `None` selects an in-memory record store.
    pub database_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            database_path: None,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError {
                key: ENV_LOG_LEVEL,
                message,
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|message| ConfigError {
                key: ENV_LOG_DIR,
                message,
            })?);
        }

        config.database_path = read(ENV_DB_PATH).map(|path| PathBuf::from(path.trim()));

        Ok(config)
    }
}
