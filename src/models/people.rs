//! Students and teachers.

use serde::{Deserialize, Serialize};

use super::lenient;

/// A student enrolled at the center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store identifier.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    /// The teacher the student is assigned to.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub teacher_id: Option<String>,
    /// Display name of the assigned teacher, kept for listings only.
    #[serde(default)]
    pub teacher_name: Option<String>,
    /// Branch the student attends.
    #[serde(default)]
    pub branch: Option<String>,
}

/// A teacher profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Store identifier.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    /// Branch the teacher works at.
    #[serde(default)]
    pub branch: Option<String>,
    /// Weekly work schedule, keyed by localized weekday name.
    #[serde(default)]
    pub work_schedule: super::WorkSchedule,
}
