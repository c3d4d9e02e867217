mod config;

pub use config::{Config, NotificationsConfig, TimerConfig, DURATION_BOUNDS, INTERVAL_BOUNDS};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tomatick[-dev]/` based on TOMATICK_ENV.
///
/// Set TOMATICK_ENV=dev to use the development config directory.
/// The directory is not created until something is saved into it.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| ConfigError::NoConfigDir("no home directory".into()))?;

    let env = std::env::var("TOMATICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tomatick-dev")
    } else {
        base_dir.join("tomatick")
    };

    Ok(dir)
}
