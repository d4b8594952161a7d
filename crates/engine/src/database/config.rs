//! Database configuration via `jadb.toml`
//!
//! Every field has a default, so an empty or partial file is valid. To change
//! settings, edit the file and reopen the database.

use jadb_concurrency::LockPolicy;
use jadb_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Config file name looked up next to the application
pub const CONFIG_FILE_NAME: &str = "jadb.toml";

/// Database configuration loaded from `jadb.toml`.
///
/// # Example
///
/// ```toml
/// dir = "data/tables"
/// log = "info"
/// lock_retry_delay_ms = 50
/// lock_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JadbConfig {
    /// Directory holding one `<table>.json` per table.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Log level: `off`, `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log")]
    pub log: String,
    /// Write log output to this file instead of stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfile: Option<PathBuf>,
    /// Sleep between polls of a checked-out table.
    #[serde(default = "default_lock_retry_delay_ms")]
    pub lock_retry_delay_ms: u64,
    /// Give up on a checked-out table after this long; `0` waits forever.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_dir() -> PathBuf {
    PathBuf::from("jadb")
}

fn default_log() -> String {
    "warn".to_string()
}

fn default_lock_retry_delay_ms() -> u64 {
    50
}

fn default_lock_timeout_ms() -> u64 {
    30_000
}

impl Default for JadbConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            log: default_log(),
            logfile: None,
            lock_retry_delay_ms: default_lock_retry_delay_ms(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl JadbConfig {
    /// Default configuration rooted at `dir`
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Lock polling policy described by this config
    pub fn lock_policy(&self) -> LockPolicy {
        let timeout = match self.lock_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        LockPolicy::new(Duration::from_millis(self.lock_retry_delay_ms), timeout)
    }

    /// Parse the log level.
    ///
    /// `verbose` and `silly` are accepted as aliases for `debug` and `trace`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an unknown level.
    pub fn log_level(&self) -> Result<LevelFilter> {
        let level = match self.log.trim().to_ascii_lowercase().as_str() {
            "verbose" => "debug".to_string(),
            "silly" => "trace".to_string(),
            other => other.to_string(),
        };
        LevelFilter::from_str(&level).map_err(|_| {
            Error::Validation(format!(
                "Invalid log level '{}' in jadb.toml. Expected one of off, error, warn, info, debug, trace.",
                self.log
            ))
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# jadb configuration
#
# Directory holding one <table>.json file per table
dir = "jadb"

# Log level: off, error, warn (default), info, debug, trace
log = "warn"

# Write log output to a file instead of stderr
# logfile = "jadb.log"

# Lock polling: delay between retries and how long to wait for a
# checked-out table before failing (0 = wait forever)
lock_retry_delay_ms = 50
lock_timeout_ms = 30000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// invalid log level.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: JadbConfig = toml::from_str(&content).map_err(|e| {
            Error::Validation(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.log_level()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
