//! Log output setup
//!
//! Library code only emits `tracing` events; applications opt into output by
//! calling [`init_logging`] once with their [`JadbConfig`].

use crate::database::JadbConfig;
use jadb_core::error::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;

/// Install a global fmt subscriber at the configured level
///
/// Returns `Ok(false)` if a global subscriber was already installed, so
/// repeated calls are harmless.
///
/// # Errors
///
/// Returns an error for an invalid log level or an unwritable log file.
pub fn init_logging(config: &JadbConfig) -> Result<bool> {
    let level = config.log_level()?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match &config.logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::Internal(format!(
                        "Failed to open log file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok()
        }
        None => builder.try_init().is_ok(),
    };
    Ok(installed)
}
