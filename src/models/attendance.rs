//! Attendance records and work schedules.
//!
//! An administrator records one [`AttendanceRecord`] per teacher per day; a
//! teacher's [`WorkSchedule`] says which weekdays they are expected and in
//! which window.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::lenient;

/// The status an administrator gave a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The teacher came in.
    Present,
    /// Absent without permission.
    Absent,
    /// The teacher came in late.
    Late,
    /// Absent with permission.
    Permission,
    /// Not yet filled in.
    #[default]
    #[serde(other)]
    Unset,
}

/// One teacher's attendance on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Store identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// The teacher this record belongs to.
    #[serde(deserialize_with = "lenient::string")]
    pub teacher_id: String,
    /// The day being recorded.
    pub record_date: NaiveDate,
    /// The recorded status.
    #[serde(default, deserialize_with = "status_or_unset")]
    pub status: AttendanceStatus,
    /// Arrival time.
    #[serde(default, deserialize_with = "lenient::opt_time")]
    pub check_in: Option<NaiveTime>,
    /// Departure time.
    #[serde(default, deserialize_with = "lenient::opt_time")]
    pub check_out: Option<NaiveTime>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Returns the weekday of the record.
    pub fn weekday(&self) -> Weekday {
        self.record_date.weekday()
    }

    /// Returns true if the teacher was on site that day.
    pub fn is_attended(&self) -> bool {
        matches!(
            self.status,
            AttendanceStatus::Present | AttendanceStatus::Late
        )
    }
}

fn status_or_unset<'de, D>(deserializer: D) -> Result<AttendanceStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<AttendanceStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// The expected working window for one weekday.
///
/// Either bound may be missing; the day still counts as scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// Expected start.
    #[serde(default, deserialize_with = "lenient::opt_time")]
    pub from: Option<NaiveTime>,
    /// Expected end.
    #[serde(default, deserialize_with = "lenient::opt_time")]
    pub to: Option<NaiveTime>,
}

/// A teacher's weekly schedule, keyed by localized weekday name.
///
/// # Example
///
/// ```
/// use center_payroll::models::WorkSchedule;
///
/// let schedule: WorkSchedule =
///     serde_json::from_str(r#"{"الأحد": {"from": "16:00", "to": "20:00"}}"#).unwrap();
/// assert!(schedule.window_for("الأحد").is_some());
/// assert!(schedule.window_for("الاثنين").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkSchedule {
    days: HashMap<String, ScheduleWindow>,
}

impl WorkSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the window for a day.
    pub fn with_day(mut self, day_name: impl Into<String>, window: ScheduleWindow) -> Self {
        self.days.insert(day_name.into(), window);
        self
    }

    /// Returns the window scheduled under `day_name`, if any.
    pub fn window_for(&self, day_name: &str) -> Option<&ScheduleWindow> {
        self.days.get(day_name)
    }

    /// Number of scheduled days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if no day is scheduled.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
