//! Configuration loading and management for the center payroll engine.
//!
//! This module provides functionality to load the center configuration from
//! YAML files (class rates, wage rule constants, weekday names) and the
//! locally persisted settings file.
//!
//! # Example
//!
//! ```no_run
//! use center_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/center").unwrap();
//! println!("Loaded center: {}", config.center().name);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::{CENTER_NAME_KEY, LocalSettings};
pub use types::{
    CenterConfig, CenterMetadata, ClassRate, ClassRateTable, GenerativeConfig, StoreConfig,
    WageRulesConfig, WeekdayNames,
};
