//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Phase lengths and the long-break interval
//! - Notification preferences (sound, screen wake lock)
//!
//! Configuration is stored at `~/.config/tomatick/config.toml` unless a path
//! is given explicitly. Only settings live here; timer and task state are
//! never written to disk.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::TimerSettings;

/// Accepted phase length in minutes.
pub const DURATION_BOUNDS: RangeInclusive<u32> = 1..=60;
/// Accepted number of work sessions between long breaks.
pub const INTERVAL_BOUNDS: RangeInclusive<u32> = 1..=12;

/// Timer-specific configuration. All durations are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_pomodoro")]
    pub pomodoro: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Keep the screen awake while a countdown runs.
    #[serde(default = "default_true")]
    pub wake_lock: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_pomodoro() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro: default_pomodoro(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            wake_lock: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

/// Bounds for numeric keys. `None` for keys without a numeric range.
fn bounds_for(key: &str) -> Option<RangeInclusive<u32>> {
    match key {
        "timer.pomodoro" | "timer.short_break" | "timer.long_break" => Some(DURATION_BOUNDS),
        "timer.long_break_interval" => Some(INTERVAL_BOUNDS),
        _ => None,
    }
}

fn clamp_to(key: &str, value: i64, bounds: &RangeInclusive<u32>) -> u32 {
    let clamped = value.clamp(i64::from(*bounds.start()), i64::from(*bounds.end()));
    if clamped != value {
        warn!(key, value, clamped, "configuration value out of range, clamped");
    }
    // Within u32 range after clamping.
    clamped as u32
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("cannot parse '{value}' as a boolean"),
        }),
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(parse_bool(key, value)?),
                    serde_json::Value::Number(_) => {
                        let n = value.trim().parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                            key: key.into(),
                            message: format!("cannot parse '{value}' as a whole number"),
                        })?;
                        let bounds = bounds_for(key).unwrap_or(0..=u32::MAX);
                        serde_json::Value::Number(clamp_to(key, n, &bounds).into())
                    }
                    // Sections cannot be assigned a scalar.
                    _ => return Err(unknown()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path`, or return defaults if the file does not exist.
    /// Out-of-range values are clamped.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                debug!(path = %path.display(), "configuration loaded");
                Ok(cfg.sanitized())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// Numbers outside their bounds are clamped; the value is not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Every settable key, sorted.
    pub fn keys() -> Vec<String> {
        let mut keys = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(Self::default()) {
            for (section, fields) in sections {
                if let serde_json::Value::Object(fields) = fields {
                    keys.extend(fields.keys().map(|field| format!("{section}.{field}")));
                }
            }
        }
        keys
    }

    /// Copy with every numeric value forced into its bounds.
    pub fn sanitized(mut self) -> Self {
        let t = &mut self.timer;
        t.pomodoro = clamp_to("timer.pomodoro", t.pomodoro.into(), &DURATION_BOUNDS);
        t.short_break = clamp_to("timer.short_break", t.short_break.into(), &DURATION_BOUNDS);
        t.long_break = clamp_to("timer.long_break", t.long_break.into(), &DURATION_BOUNDS);
        t.long_break_interval = clamp_to(
            "timer.long_break_interval",
            t.long_break_interval.into(),
            &INTERVAL_BOUNDS,
        );
        self
    }

    /// Phase lengths for the timer engine.
    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            pomodoro_min: self.timer.pomodoro,
            short_break_min: self.timer.short_break,
            long_break_min: self.timer.long_break,
            long_break_interval: self.timer.long_break_interval,
        }
    }
}
