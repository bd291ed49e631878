//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Collect database, logging and preference locations in one value.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults under the temp dir.
//! - The log level is normalized before it leaves this module.

use crate::logging::{default_log_level, parse_level};
use log::LevelFilter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "MYNOTES_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MYNOTES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MYNOTES_LOG_DIR";
pub const ENV_PREFS_PATH: &str = "MYNOTES_PREFS_PATH";

const DEFAULT_DB_FILE_NAME: &str = "mynotes.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "mynotes-logs";
const DEFAULT_PREFS_FILE_NAME: &str = "mynotes-prefs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: LevelFilter,
    pub log_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves every setting through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let temp_dir = std::env::temp_dir();

        let log_level = match non_blank(ENV_LOG_LEVEL) {
            Some(raw) => {
                parse_level(&raw).map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?
            }
            None => default_log_level(),
        };

        Ok(Self {
            db_path: non_blank(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| temp_dir.join(DEFAULT_DB_FILE_NAME)),
            log_level,
            log_dir: non_blank(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| temp_dir.join(DEFAULT_LOG_DIR_NAME)),
            prefs_path: non_blank(ENV_PREFS_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| temp_dir.join(DEFAULT_PREFS_FILE_NAME)),
        })
    }
}
