//! Locally persisted key/value settings.
//!
//! The dashboard keeps a handful of per-installation strings (currently the
//! center display name) outside the shared store. [`LocalSettings`] holds
//! them in memory and reads/writes a JSON file only on explicit
//! [`LocalSettings::load`] and [`LocalSettings::save`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

use super::types::CenterMetadata;

/// Key under which the center display name is stored.
pub const CENTER_NAME_KEY: &str = "center_name";

/// Key/value settings backed by a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl LocalSettings {
    /// Reads settings from `path`. A missing file yields empty settings.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.display().to_string();

        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                    path: path_str,
                    message: e.to_string(),
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(EngineError::ConfigParseError {
                    path: path_str,
                    message: err.to_string(),
                });
            }
        };

        Ok(Self { path, values })
    }

    /// Writes the current values back to the settings file.
    pub fn save(&self) -> EngineResult<()> {
        let path_str = self.path.display().to_string();
        let content =
            serde_json::to_string_pretty(&self.values).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::ConfigParseError {
                    path: path_str.clone(),
                    message: e.to_string(),
                })?;
            }
        }

        fs::write(&self.path, content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })?;
        tracing::debug!(path = %self.path.display(), keys = self.values.len(), "Saved settings");
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stores `value` under `key` in memory.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// The center display name, falling back to the configured name.
    pub fn center_name<'a>(&'a self, center: &'a CenterMetadata) -> &'a str {
        self.get(CENTER_NAME_KEY)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(center.name.as_str())
    }

    /// Sets the center display name, rejecting blank names.
    pub fn set_center_name(&mut self, name: &str) -> EngineResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EngineError::validation(CENTER_NAME_KEY, "must not be empty"));
        }
        self.set(CENTER_NAME_KEY, trimmed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("center-payroll-{}-{}", name, uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let settings = LocalSettings::load(temp_settings_path("missing")).unwrap();
        assert!(settings.get(CENTER_NAME_KEY).is_none());
    }

    #[test]
    fn test_center_name_falls_back_to_config() {
        let settings = LocalSettings::load(temp_settings_path("fallback")).unwrap();
        let center = CenterMetadata::default();
        assert_eq!(settings.center_name(&center), center.name);
    }

    #[test]
    fn test_save_then_load_keeps_center_name() {
        let path = temp_settings_path("roundtrip");
        let mut settings = LocalSettings::load(&path).unwrap();
        settings.set_center_name("  دار الأرقم  ").unwrap();
        settings.save().unwrap();

        let reloaded = LocalSettings::load(&path).unwrap();
        assert_eq!(
            reloaded.center_name(&CenterMetadata::default()),
            "دار الأرقم"
        );
    }

    #[test]
    fn test_blank_center_name_rejected() {
        let mut settings = LocalSettings::load(temp_settings_path("blank")).unwrap();
        assert!(matches!(
            settings.set_center_name("   "),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let path = temp_settings_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            LocalSettings::load(&path),
            Err(EngineError::ConfigParseError { .. })
        ));
    }
}
