//! Runtime configuration for embedding callers and the CLI.
//!
//! # Responsibility
//! - Deserialize core settings from JSON.
//! - Turn settings into a ready connection, cache and logger.
//!
//! # Invariants
//! - `log_dir`, when present, must be absolute.
//! - A file database requires a non-empty path.

use crate::cache::{InMemoryQueryCache, QueryCache};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Where person types are stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DatabaseConfig {
    #[default]
    Memory,
    File {
        path: PathBuf,
    },
}

/// Core settings.
///
/// ```json
/// {
///   "database": { "mode": "file", "path": "/var/lib/persontype.db" },
///   "log_level": "info",
///   "log_dir": "/var/log/persontype",
///   "cache_enabled": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "cache_enabled_default")]
    pub cache_enabled: bool,
}

fn cache_enabled_default() -> bool {
    true
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            log_level: None,
            log_dir: None,
            cache_enabled: cache_enabled_default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let DatabaseConfig::File { path } = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "database.path cannot be empty".to_string(),
                ));
            }
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if let Some(level) = &self.log_level {
            normalize_level(level).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Configured level, or the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Opens the configured database with migrations applied.
    pub fn open_database(&self) -> DbResult<Connection> {
        match &self.database {
            DatabaseConfig::Memory => open_db_in_memory(),
            DatabaseConfig::File { path } => open_db(path),
        }
    }

    /// Builds the shared query cache, if enabled.
    pub fn build_cache(&self) -> Option<Arc<dyn QueryCache>> {
        if self.cache_enabled {
            Some(Arc::new(InMemoryQueryCache::new()))
        } else {
            None
        }
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when no directory is configured.
    pub fn start_logging(&self) -> ConfigResult<bool> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| ConfigError::Invalid("log_dir must be valid UTF-8".to_string()))?;
        init_logging(self.effective_log_level(), dir).map_err(ConfigError::Invalid)?;
        Ok(true)
    }
}
