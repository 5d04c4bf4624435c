//! TOML-based user preferences.
//!
//! Stores:
//! - Default session shape (cycles per set, sets, relax length)
//! - The breath pattern to start from (a preset id or a custom phase list)
//! - Notification preferences
//!
//! Preferences seed new sessions; the running session itself is never saved.
//! Configuration is stored at `~/.config/breathloop/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{preset, Pattern, Phase, SessionConfig};

/// Session-shape defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cycles_per_set")]
    pub cycles_per_set: u32,
    #[serde(default = "default_number_of_sets")]
    pub number_of_sets: u32,
    #[serde(default = "default_relax_secs")]
    pub relax_secs: u32,
}

/// Which pattern a new session starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Overrides `preset` when set.
    #[serde(default)]
    pub custom: Option<Vec<Phase>>,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Stored for hosts with haptics; the terminal has none.
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
    /// 0..=100. Zero silences the terminal bell.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/breathloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub pattern: PatternSettings,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_cycles_per_set() -> u32 {
    5
}
fn default_number_of_sets() -> u32 {
    1
}
fn default_relax_secs() -> u32 {
    30
}
fn default_preset() -> String {
    "inhale-hold-exhale".into()
}
fn default_true() -> bool {
    true
}
fn default_volume() -> u32 {
    70
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cycles_per_set: default_cycles_per_set(),
            number_of_sets: default_number_of_sets(),
            relax_secs: default_relax_secs(),
        }
    }
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            custom: None,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            volume: default_volume(),
        }
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => {
                    let b = value.parse::<bool>().map_err(|e| invalid(e.to_string()))?;
                    serde_json::Value::Bool(b)
                }
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u32>()
                        .map_err(|_| invalid(format!("'{value}' is not a whole number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_)
                | serde_json::Value::Array(_)
                | serde_json::Value::Null => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving `self` unchanged) if the key is unknown, the
    /// value cannot be parsed, or the result would not produce a valid session.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let updated: Config = serde_json::from_value(json).map_err(invalid)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`]; also fails if the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that these preferences describe a playable session.
    pub fn validate(&self) -> Result<()> {
        if self.notifications.volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.volume".into(),
                message: "must be between 0 and 100".into(),
            }
            .into());
        }
        self.session_parts().map(|_| ())
    }

    /// The pattern and session shape a new session should start with.
    ///
    /// # Errors
    ///
    /// Fails on an unknown preset id, an invalid custom pattern, or zero
    /// cycles/sets.
    pub fn session_parts(&self) -> Result<(Pattern, SessionConfig)> {
        let pattern = match &self.pattern.custom {
            Some(phases) => Pattern::new(phases.clone())?,
            None => {
                preset(&self.pattern.preset)
                    .ok_or_else(|| ConfigError::UnknownPreset(self.pattern.preset.clone()))?
                    .pattern
            }
        };
        let config = SessionConfig::new(
            self.session.cycles_per_set,
            self.session.number_of_sets,
            self.session.relax_secs,
        )?;
        Ok((pattern, config))
    }
}
