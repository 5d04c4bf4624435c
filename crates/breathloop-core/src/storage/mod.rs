mod config;

pub use config::{Config, NotificationsConfig, PatternSettings, SessionSettings};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/breathloop[-dev]/` based on BREATHLOOP_ENV.
///
/// Set BREATHLOOP_ENV=dev to use the development directory, or
/// BREATHLOOP_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("BREATHLOOP_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BREATHLOOP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("breathloop-dev")
            } else {
                base_dir.join("breathloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
