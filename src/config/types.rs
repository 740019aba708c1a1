//! Configuration types for the center payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type has a default
//! matching the files shipped in `config/center`.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifying information about the center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterMetadata {
    /// Display name shown when no local override is saved.
    pub name: String,
    /// Currency code used in reports.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "EGP".to_string()
}

impl Default for CenterMetadata {
    fn default() -> Self {
        Self {
            name: "مركز التحفيظ".to_string(),
            currency: default_currency(),
        }
    }
}

/// The hourly rate for one class type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRate {
    /// The class type as stored on classes.
    pub class_type: String,
    /// Pay per teaching hour.
    pub hourly: Decimal,
}

/// Fixed hourly rates by class type.
///
/// Unknown class types are paid at the lowest listed rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRateTable {
    /// The listed rates.
    pub rates: Vec<ClassRate>,
}

impl ClassRateTable {
    /// Looks up the rate for `class_type`.
    ///
    /// Returns the rate and whether it was listed (false when the lowest rate
    /// was used as a fallback).
    ///
    /// # Example
    ///
    /// ```
    /// use center_payroll::config::ClassRateTable;
    /// use rust_decimal::Decimal;
    ///
    /// let table = ClassRateTable::default();
    /// assert_eq!(table.rate_for("متون"), (Decimal::new(80, 0), true));
    /// assert_eq!(table.rate_for("unknown"), (Decimal::new(65, 0), false));
    /// ```
    pub fn rate_for(&self, class_type: &str) -> (Decimal, bool) {
        let wanted = class_type.trim();
        match self.rates.iter().find(|r| r.class_type == wanted) {
            Some(rate) => (rate.hourly, true),
            None => (self.lowest_rate(), false),
        }
    }

    /// The lowest listed rate, or zero for an empty table.
    pub fn lowest_rate(&self) -> Decimal {
        self.rates
            .iter()
            .map(|r| r.hourly)
            .min()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for ClassRateTable {
    fn default() -> Self {
        Self {
            rates: vec![
                ClassRate {
                    class_type: "تحفيظ وتجويد".to_string(),
                    hourly: Decimal::new(65, 0),
                },
                ClassRate {
                    class_type: "متون".to_string(),
                    hourly: Decimal::new(80, 0),
                },
            ],
        }
    }
}

/// Attendance thresholds and wage rule constants for the teacher payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageRulesConfig {
    /// Divisor turning one day's pay into an hourly rate.
    pub hours_per_day: u32,
    /// Minutes after the scheduled start before a check-in counts as late.
    pub late_grace_minutes: i64,
    /// Minutes after the scheduled end before a check-out counts as overtime.
    pub overtime_threshold_minutes: i64,
    /// Days of pay deducted per unpermitted absence.
    pub unpermitted_absence_multiplier: Decimal,
}

impl Default for WageRulesConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 8,
            late_grace_minutes: 10,
            overtime_threshold_minutes: 30,
            unpermitted_absence_multiplier: Decimal::ONE,
        }
    }
}

/// Localized weekday names used as work schedule keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayNames {
    /// Sunday.
    pub sunday: String,
    /// Monday.
    pub monday: String,
    /// Tuesday.
    pub tuesday: String,
    /// Wednesday.
    pub wednesday: String,
    /// Thursday.
    pub thursday: String,
    /// Friday.
    pub friday: String,
    /// Saturday.
    pub saturday: String,
}

impl WeekdayNames {
    /// The localized name of `weekday`.
    pub fn name_for(&self, weekday: Weekday) -> &str {
        match weekday {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }
}

impl Default for WeekdayNames {
    fn default() -> Self {
        Self {
            sunday: "الأحد".to_string(),
            monday: "الاثنين".to_string(),
            tuesday: "الثلاثاء".to_string(),
            wednesday: "الأربعاء".to_string(),
            thursday: "الخميس".to_string(),
            friday: "الجمعة".to_string(),
            saturday: "السبت".to_string(),
        }
    }
}

/// Settings for the generative-text client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerativeConfig {
    /// Base URL of the generative-language API.
    #[serde(default = "default_generative_endpoint")]
    pub endpoint: String,
    /// Model name.
    #[serde(default = "default_generative_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_generative_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generative_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generative_endpoint(),
            model: default_generative_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Connection settings for the hosted row store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the REST endpoint (without `/rest/v1`).
    pub url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_store_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds.
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_key_env() -> String {
    "STORE_API_KEY".to_string()
}

fn default_store_timeout() -> u64 {
    15
}

/// `center.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CenterFile {
    /// Center metadata.
    pub center: CenterMetadata,
    /// Optional generative-text settings.
    #[serde(default)]
    pub generative: Option<GenerativeConfig>,
    /// Optional hosted store; the in-memory store is used without it.
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

/// The complete center configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterConfig {
    metadata: CenterMetadata,
    class_rates: ClassRateTable,
    wage_rules: WageRulesConfig,
    weekdays: WeekdayNames,
    generative: Option<GenerativeConfig>,
    store: Option<StoreConfig>,
}

impl CenterConfig {
    /// Creates a CenterConfig from its component parts.
    pub fn new(
        metadata: CenterMetadata,
        class_rates: ClassRateTable,
        wage_rules: WageRulesConfig,
        weekdays: WeekdayNames,
        generative: Option<GenerativeConfig>,
    ) -> Self {
        Self {
            metadata,
            class_rates,
            wage_rules,
            weekdays,
            generative,
            store: None,
        }
    }

    /// Attaches hosted store settings.
    pub fn with_store(mut self, store: Option<StoreConfig>) -> Self {
        self.store = store;
        self
    }

    /// Returns the center metadata.
    pub fn center(&self) -> &CenterMetadata {
        &self.metadata
    }

    /// Returns the class rate table.
    pub fn class_rates(&self) -> &ClassRateTable {
        &self.class_rates
    }

    /// Returns the wage rule constants.
    pub fn wage_rules(&self) -> &WageRulesConfig {
        &self.wage_rules
    }

    /// Returns the localized weekday names.
    pub fn weekdays(&self) -> &WeekdayNames {
        &self.weekdays
    }

    /// Returns the generative-text settings, if configured.
    pub fn generative(&self) -> Option<&GenerativeConfig> {
        self.generative.as_ref()
    }

    /// Returns the hosted store settings, if configured.
    pub fn store(&self) -> Option<&StoreConfig> {
        self.store.as_ref()
    }
}
