//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the center
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

use super::types::{
    CenterConfig, CenterFile, CenterMetadata, ClassRateTable, WageRulesConfig, WeekdayNames,
};

/// Loads and provides access to the center configuration.
///
/// # Directory Structure
///
/// ```text
/// config/center/
/// ├── center.yaml       # Center metadata and generative-text settings
/// ├── class_rates.yaml  # Hourly rate per class type
/// ├── wage_rules.yaml   # Attendance thresholds and wage rule constants
/// └── weekdays.yaml     # Optional localized weekday names
/// ```
///
/// # Example
///
/// ```no_run
/// use center_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/center").unwrap();
/// println!("Center: {}", loader.center().name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: CenterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `center.yaml`, `class_rates.yaml` or `wage_rules.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The class rate table is empty
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let center_file = Self::load_yaml::<CenterFile>(&path.join("center.yaml"))?;

        let rates_path = path.join("class_rates.yaml");
        let class_rates = Self::load_yaml::<ClassRateTable>(&rates_path)?;
        if class_rates.rates.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: rates_path.display().to_string(),
                message: "at least one class rate is required".to_string(),
            });
        }

        let wage_rules = Self::load_yaml::<WageRulesConfig>(&path.join("wage_rules.yaml"))?;
        if wage_rules.hours_per_day == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.join("wage_rules.yaml").display().to_string(),
                message: "hours_per_day must be greater than zero".to_string(),
            });
        }

        let weekdays_path = path.join("weekdays.yaml");
        let weekdays = if weekdays_path.exists() {
            Self::load_yaml::<WeekdayNames>(&weekdays_path)?
        } else {
            WeekdayNames::default()
        };

        let config = CenterConfig::new(
            center_file.center,
            class_rates,
            wage_rules,
            weekdays,
            center_file.generative,
        )
        .with_store(center_file.store);

        tracing::debug!(
            path = %path.display(),
            class_types = config.class_rates().rates.len(),
            "Loaded center configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: CenterConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying center configuration.
    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    /// Returns the center metadata.
    pub fn center(&self) -> &CenterMetadata {
        self.config.center()
    }

    /// Gets the hourly rate for a class type, falling back to the lowest rate.
    pub fn class_rate(&self, class_type: &str) -> Decimal {
        self.config.class_rates().rate_for(class_type).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn config_path() -> &'static str {
        "./config/center"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.center().currency, "EGP");
    }

    #[test]
    fn test_shipped_files_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let config = loader.config();
        assert_eq!(config.class_rates(), &ClassRateTable::default());
        assert_eq!(config.wage_rules(), &WageRulesConfig::default());
        assert_eq!(config.weekdays(), &WeekdayNames::default());
    }

    #[test]
    fn test_class_rate_lookup() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.class_rate("متون"), Decimal::new(80, 0));
        assert_eq!(loader.class_rate("تحفيظ وتجويد"), Decimal::new(65, 0));
        assert_eq!(loader.class_rate("غير معروف"), Decimal::new(65, 0));
    }

    #[test]
    fn test_weekday_names_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config().weekdays().name_for(Weekday::Sat), "السبت");
    }

    #[test]
    fn test_generative_settings_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let generative = loader.config().generative().unwrap();
        assert_eq!(generative.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("center.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_loader_uses_default_config() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.class_rate("متون"), Decimal::new(80, 0));
        assert!(loader.config().generative().is_none());
    }
}
