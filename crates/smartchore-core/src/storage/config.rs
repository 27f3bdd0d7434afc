//! TOML-based application configuration.
//!
//! Stores tuning for every stage of a planning run:
//! - Engine repair budget and preference nudges
//! - Fairness weights and workload-level thresholds
//! - Availability check instants
//! - Text advisor endpoint and timeouts
//! - Catalog cadence and an optional custom catalog file
//!
//! Configuration is stored at `~/.config/smartchore/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::advisor::AdvisorConfig;
use crate::assignment::EngineConfig;
use crate::availability::AvailabilityConfig;
use crate::catalog::{CadenceConfig, ChoreCatalog};
use crate::error::ConfigError;
use crate::fairness::FairnessConfig;

/// Catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub cadence: CadenceConfig,
    /// TOML file with `[[chore]]` tables replacing the built-in catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CatalogConfig {
    /// The configured catalog, or the household default.
    pub fn load_catalog(&self) -> Result<ChoreCatalog, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(ChoreCatalog::household_default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from(path),
            message: e.to_string(),
        })?;
        ChoreCatalog::from_toml_str(&content).map_err(|e| ConfigError::InvalidValue {
            key: "catalog.path".to_string(),
            message: e.to_string(),
        })
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/smartchore/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub fairness: FairnessConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part);

                let new_value = match existing {
                    Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    Some(serde_json::Value::Number(_)) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    Some(_) => serde_json::Value::String(value.into()),
                    // Optional fields are absent until first set
                    None if Self::is_optional_key(key) => serde_json::Value::String(value.into()),
                    None => return Err(unknown()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn is_optional_key(key: &str) -> bool {
        key == "catalog.path"
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// The value keeps the type of the existing field; unknown keys and
    /// values the section cannot accept are rejected and leave `self`
    /// unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and persist to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every leaf key with its current value, in section order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            flatten("", &json, &mut out);
        }
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
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
        assert_eq!(parsed.engine.repair_max_iterations, 100);
        assert_eq!(parsed.fairness.time_weight, 0.6);
        assert_eq!(parsed.catalog.cadence.monthly_day, 1);
        assert!(parsed.catalog.path.is_none());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.advisor.timeout_ms, 3000);
        assert!(!parsed.advisor.enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let parsed: Config = toml::from_str("[engine]\nrepair_gap_minutes = 30\n").unwrap();
        assert_eq!(parsed.engine.repair_gap_minutes, 30);
        assert_eq!(parsed.engine.reassign_max_difficulty, 6);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("advisor.enabled").as_deref(), Some("false"));
        assert_eq!(cfg.get("engine.repair_gap_minutes").as_deref(), Some("60"));
        assert!(cfg.get("engine.missing_key").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("advisor.enabled", "true").unwrap();
        cfg.apply("fairness.overload_ratio", "2.0").unwrap();
        cfg.apply("advisor.model", "other-model").unwrap();
        assert!(cfg.advisor.enabled);
        assert_eq!(cfg.fairness.overload_ratio, 2.0);
        assert_eq!(cfg.advisor.model, "other-model");
    }

    #[test]
    fn apply_sets_optional_catalog_path() {
        let mut cfg = Config::default();
        cfg.apply("catalog.path", "/tmp/chores.toml").unwrap();
        assert_eq!(cfg.catalog.path.as_deref(), Some("/tmp/chores.toml"));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("engine.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("advisor.enabled", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("engine.repair_max_iterations", "lots").is_err());
    }

    #[test]
    fn apply_rejects_value_section_cannot_hold() {
        let mut cfg = Config::default();
        assert!(cfg.apply("catalog.cadence.weekly_day", "Caturday").is_err());
        assert_eq!(cfg.catalog.cadence.weekly_day, chrono::Weekday::Sat);
    }

    #[test]
    fn entries_list_leaf_keys() {
        let entries = Config::default().entries();
        assert!(entries.iter().any(|(k, v)| k == "engine.repair_max_iterations" && v == "100"));
        assert!(entries.iter().any(|(k, _)| k == "availability.morning_check"));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.engine.repair_max_iterations, 100);

        let mut changed = cfg.clone();
        changed.apply("engine.repair_gap_minutes", "45").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().engine.repair_gap_minutes, 45);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let cfg = CatalogConfig {
            path: Some("/definitely/not/here.toml".to_string()),
            ..CatalogConfig::default()
        };
        assert!(matches!(cfg.load_catalog(), Err(ConfigError::LoadFailed { .. })));
    }
}
