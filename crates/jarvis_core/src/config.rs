//! Runtime configuration resolved from the environment.
//!
//! | variable                | default                          |
//! |-------------------------|----------------------------------|
//! | `JARVIS_DATA_DIR`       | `<temp dir>/jarvis`              |
//! | `JARVIS_DB_PATH`        | `<data dir>/jarvis.sqlite3`      |
//! | `JARVIS_LOG_LEVEL`      | `default_log_level()`            |
//! | `JARVIS_THINK_DELAY_MS` | 500                              |
//!
//! Empty values count as unset.

use crate::command::session::DEFAULT_THINK_DELAY;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "JARVIS_DATA_DIR";
pub const DB_PATH_ENV: &str = "JARVIS_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "JARVIS_LOG_LEVEL";
pub const THINK_DELAY_ENV: &str = "JARVIS_THINK_DELAY_MS";

const DEFAULT_DATA_DIR_NAME: &str = "jarvis";
const DB_FILE_NAME: &str = "jarvis.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `JARVIS_DATA_DIR` must be absolute so log init accepts it.
    RelativeDataDir(PathBuf),
    InvalidLogLevel(String),
    InvalidThinkDelay(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => write!(
                f,
                "{DATA_DIR_ENV} must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidLogLevel(value) => write!(f, "{LOG_LEVEL_ENV} is invalid: `{value}`"),
            Self::InvalidThinkDelay(value) => {
                write!(f, "{THINK_DELAY_ENV} must be milliseconds, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub think_delay: Duration,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match read(DATA_DIR_ENV) {
            Some(raw) => {
                let path = PathBuf::from(raw);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeDataDir(path));
                }
                path
            }
            None => std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
        };
        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));
        let log_level = match read(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(|_| ConfigError::InvalidLogLevel(raw))?,
            None => default_log_level(),
        };
        let think_delay = match read(THINK_DELAY_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidThinkDelay(raw))?,
            None => DEFAULT_THINK_DELAY,
        };

        Ok(Self {
            data_dir,
            db_path,
            log_level,
            think_delay,
        })
    }

    /// Directory receiving rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}
