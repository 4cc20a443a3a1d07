//! TOML-based application configuration.
//!
//! Stores the reset-clock settings (hour + UTC offset) and storage knobs.
//! Configuration is stored at `~/.config/praxis/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::gate::{ResetClock, DEFAULT_RESET_HOUR, DEFAULT_UTC_OFFSET_MINUTES};

/// Reset-clock configuration. The hour and offset are supplied at startup
/// and consumed identically by every caller; nothing is baked into the
/// gate logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    #[serde(default = "default_reset_hour")]
    pub hour: u8,
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bound on how long a store call may wait on a locked database.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/praxis/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reset: ResetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_reset_hour() -> u8 {
    DEFAULT_RESET_HOUR
}
fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            hour: default_reset_hour(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: default_busy_timeout_ms(),
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown configuration key".to_string(),
        };
        let unparsable = |what: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as {what}"),
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|_| unparsable("bool"))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Some(n) =
                            value.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
                        {
                            serde_json::Value::Number(n)
                        } else {
                            return Err(unparsable("number"));
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|err| ConfigError::LoadFailed {
                path,
                message: err.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|err| ConfigError::SaveFailed {
            path: path.clone(),
            message: err.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|err| ConfigError::SaveFailed {
            path,
            message: err.to_string(),
        })
    }

    /// Load from disk, returning the defaults on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Build the validated reset clock from this configuration.
    pub fn reset_clock(&self) -> Result<ResetClock, ConfigError> {
        ResetClock::new(self.reset.hour, self.reset.utc_offset_minutes)
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

    /// Set a config value by key and persist. Fails on unknown keys,
    /// unparsable values, or values the reset clock rejects.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let json_result = serde_json::to_value(&*self);
        let mut json = json_result.map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|err| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: err.to_string(),
            }
        })?;
        updated.reset_clock()?;
        *self = updated;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.reset.hour, 6);
        assert_eq!(parsed.reset.utc_offset_minutes, 210);
        assert_eq!(parsed.storage.busy_timeout_ms, 5_000);
    }

    #[test]
    fn empty_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.reset.hour, 6);
        let parsed: Config = toml::from_str("[reset]\nhour = 9\n").unwrap();
        assert_eq!(parsed.reset.hour, 9);
        assert_eq!(parsed.reset.utc_offset_minutes, 210);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("reset.hour").as_deref(), Some("6"));
        assert_eq!(cfg.get("storage.busy_timeout_ms").as_deref(), Some("5000"));
        assert!(cfg.get("reset.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "reset.hour", "9").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "reset.hour").unwrap(),
            &serde_json::Value::Number(9.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "reset.nonexistent", "1");
        assert!(result.is_err());
    }

    #[test]
    fn reset_clock_validation() {
        let mut cfg = Config::default();
        assert!(cfg.reset_clock().is_ok());
        cfg.reset.hour = 24;
        assert!(cfg.reset_clock().is_err());
        cfg.reset.hour = 0;
        cfg.reset.utc_offset_minutes = 24 * 60;
        assert!(cfg.reset_clock().is_err());
    }
}
