//! Class session model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// A class currently assigned to a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSession {
    /// Store identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// Display name of the class.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// The teacher assigned to the class.
    #[serde(default, deserialize_with = "lenient::string")]
    pub teacher_id: String,
    /// Display name of the teacher, kept for listings only.
    #[serde(default)]
    pub teacher_name: Option<String>,
    /// Class type, looked up in the class rate table.
    #[serde(default, deserialize_with = "lenient::string")]
    pub class_type: String,
    /// Session length in minutes.
    #[serde(default, alias = "duration", deserialize_with = "lenient::decimal")]
    pub duration_minutes: Decimal,
}
