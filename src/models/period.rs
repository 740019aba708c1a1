//! Pay month model.
//!
//! Every month-scoped computation (attendance, roll-ups, salary generation)
//! is keyed by a [`PayMonth`].

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month within a year.
///
/// # Example
///
/// ```
/// use center_payroll::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let period = PayMonth::new(3, 2026).unwrap();
/// assert!(period.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
/// assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayMonth {
    /// The year (e.g. 2026).
    pub year: i32,
    /// The month, 1 through 12.
    pub month: u32,
}

impl PayMonth {
    /// Creates a pay month, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns true if `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Validates a pay month that arrived through deserialization.
    pub fn validate(self) -> EngineResult<Self> {
        Self::new(self.month, self.year)
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_month_zero_and_thirteen() {
        assert!(matches!(
            PayMonth::new(0, 2026),
            Err(EngineError::InvalidPeriod { month: 0, .. })
        ));
        assert!(PayMonth::new(13, 2026).is_err());
    }

    #[test]
    fn test_contains_checks_year_too() {
        let period = PayMonth::new(1, 2026).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
    }

    #[test]
    fn test_of_date() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 30).unwrap();
        assert_eq!(PayMonth::of(date), PayMonth::new(11, 2026).unwrap());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(PayMonth::new(4, 2026).unwrap().to_string(), "2026-04");
    }

    #[test]
    fn test_deserialize_then_validate() {
        let period: PayMonth = serde_json::from_str(r#"{"month": 14, "year": 2026}"#).unwrap();
        assert!(period.validate().is_err());
    }
}
