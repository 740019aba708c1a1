//! Attendance aggregation.
//!
//! This module turns a teacher's daily attendance records for one month into
//! the counts the wage rules consume: permitted and unpermitted absences,
//! late arrivals, overtime hours and unscheduled extra days.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{WageRulesConfig, WeekdayNames};
use crate::models::{AttendanceRecord, AttendanceStatus, PayMonth, WorkSchedule};

/// Attendance counts for one teacher over one month.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::AttendanceSummary;
/// use rust_decimal::Decimal;
///
/// let summary = AttendanceSummary::default().with_unpermitted_multiplier(Decimal::new(2, 0));
/// assert_eq!(summary.unperm_multiplier, Decimal::new(2, 0));
/// assert_eq!(summary.late_hours, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days absent with permission.
    #[serde(default)]
    pub perm_absent_days: u32,
    /// Days absent without permission.
    #[serde(default)]
    pub unperm_absent_days: u32,
    /// Days of pay deducted per unpermitted absence.
    #[serde(default = "default_multiplier")]
    pub unperm_multiplier: Decimal,
    /// Late arrivals, one unit per occurrence.
    #[serde(default)]
    pub late_hours: u32,
    /// Whole overtime hours after the scheduled end.
    #[serde(default)]
    pub extra_hours: u32,
    /// Days worked that were not on the schedule.
    #[serde(default)]
    pub extra_days: u32,
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

impl Default for AttendanceSummary {
    fn default() -> Self {
        Self {
            perm_absent_days: 0,
            unperm_absent_days: 0,
            unperm_multiplier: default_multiplier(),
            late_hours: 0,
            extra_hours: 0,
            extra_days: 0,
        }
    }
}

impl AttendanceSummary {
    /// Overrides the unpermitted-absence multiplier.
    pub fn with_unpermitted_multiplier(mut self, multiplier: Decimal) -> Self {
        self.unperm_multiplier = multiplier;
        self
    }
}

/// Signed minutes from `from` to `to` on the same day.
fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (to - from).num_minutes()
}

/// Overtime hours earned by a check-out `diff_minutes` after the scheduled end.
///
/// Nothing below the threshold; otherwise whole hours, with at least one.
fn overtime_hours(diff_minutes: i64, threshold_minutes: i64) -> u32 {
    if diff_minutes < threshold_minutes {
        return 0;
    }
    let whole_hours = u32::try_from(diff_minutes / 60).unwrap_or(u32::MAX);
    whole_hours.max(1)
}

/// Aggregates one teacher's attendance for a month.
///
/// Records of other teachers and other months are skipped. For days the
/// teacher attended (`present` or `late`), the schedule window is looked up
/// under the localized weekday name:
///
/// - no window: the day counts as an extra day;
/// - a check-in more than `late_grace_minutes` after the window start adds
///   one late unit;
/// - a check-out at least `overtime_threshold_minutes` after the window end
///   adds `max(1, floor(minutes / 60))` overtime hours.
///
/// A `late` status on an unscheduled day is only counted as an extra day.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::aggregate_attendance;
/// use center_payroll::config::{WageRulesConfig, WeekdayNames};
/// use center_payroll::models::{AttendanceRecord, AttendanceStatus, PayMonth, WorkSchedule};
/// use chrono::NaiveDate;
///
/// let records = vec![AttendanceRecord {
///     id: None,
///     teacher_id: "t-1".to_string(),
///     record_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
///     status: AttendanceStatus::Absent,
///     check_in: None,
///     check_out: None,
///     notes: None,
/// }];
///
/// let summary = aggregate_attendance(
///     &records,
///     "t-1",
///     PayMonth::new(1, 2026).unwrap(),
///     &WorkSchedule::new(),
///     &WageRulesConfig::default(),
///     &WeekdayNames::default(),
/// );
/// assert_eq!(summary.unperm_absent_days, 1);
/// ```
pub fn aggregate_attendance(
    records: &[AttendanceRecord],
    teacher_id: &str,
    period: PayMonth,
    schedule: &WorkSchedule,
    rules: &WageRulesConfig,
    weekdays: &WeekdayNames,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default()
        .with_unpermitted_multiplier(rules.unpermitted_absence_multiplier);

    let in_period = records
        .iter()
        .filter(|r| r.teacher_id == teacher_id && period.contains(r.record_date));

    for record in in_period {
        match record.status {
            AttendanceStatus::Permission => summary.perm_absent_days += 1,
            AttendanceStatus::Absent => summary.unperm_absent_days += 1,
            AttendanceStatus::Present | AttendanceStatus::Late => {
                let day_name = weekdays.name_for(record.weekday());
                let Some(window) = schedule.window_for(day_name) else {
                    summary.extra_days += 1;
                    continue;
                };

                if let (Some(check_in), Some(start)) = (record.check_in, window.from) {
                    if minutes_between(start, check_in) > rules.late_grace_minutes {
                        summary.late_hours += 1;
                    }
                }

                if let (Some(check_out), Some(end)) = (record.check_out, window.to) {
                    summary.extra_hours += overtime_hours(
                        minutes_between(end, check_out),
                        rules.overtime_threshold_minutes,
                    );
                }
            }
            AttendanceStatus::Unset => {}
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleWindow;
    use chrono::NaiveDate;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn record(
        date: &str,
        status: AttendanceStatus,
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            teacher_id: "t-1".to_string(),
            record_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            status,
            check_in: check_in.map(time),
            check_out: check_out.map(time),
            notes: None,
        }
    }

    /// 2026-01-04 is a Sunday, 2026-01-05 a Monday.
    fn sunday_schedule() -> WorkSchedule {
        WorkSchedule::new().with_day(
            "الأحد",
            ScheduleWindow {
                from: Some(time("16:00")),
                to: Some(time("20:00")),
            },
        )
    }

    fn aggregate(records: &[AttendanceRecord]) -> AttendanceSummary {
        aggregate_attendance(
            records,
            "t-1",
            PayMonth::new(1, 2026).unwrap(),
            &sunday_schedule(),
            &WageRulesConfig::default(),
            &WeekdayNames::default(),
        )
    }

    #[test]
    fn test_absences_are_counted_by_kind() {
        let summary = aggregate(&[
            record("2026-01-04", AttendanceStatus::Permission, None, None),
            record("2026-01-11", AttendanceStatus::Absent, None, None),
            record("2026-01-18", AttendanceStatus::Absent, None, None),
            record("2026-01-25", AttendanceStatus::Unset, None, None),
        ]);
        assert_eq!(summary.perm_absent_days, 1);
        assert_eq!(summary.unperm_absent_days, 2);
        assert_eq!(summary.extra_days, 0);
    }

    #[test]
    fn test_other_months_and_teachers_are_skipped() {
        let mut other_teacher = record("2026-01-11", AttendanceStatus::Absent, None, None);
        other_teacher.teacher_id = "t-2".to_string();
        let summary = aggregate(&[
            record("2025-12-28", AttendanceStatus::Absent, None, None),
            record("2026-02-01", AttendanceStatus::Absent, None, None),
            other_teacher,
        ]);
        assert_eq!(summary, AttendanceSummary::default());
    }

    #[test]
    fn test_unscheduled_day_is_extra_day() {
        let summary = aggregate(&[record(
            "2026-01-05",
            AttendanceStatus::Present,
            Some("16:00"),
            Some("23:00"),
        )]);
        assert_eq!(summary.extra_days, 1);
        assert_eq!(summary.extra_hours, 0);
    }

    #[test]
    fn test_late_status_on_unscheduled_day_only_counts_extra_day() {
        let summary = aggregate(&[record(
            "2026-01-05",
            AttendanceStatus::Late,
            Some("18:00"),
            None,
        )]);
        assert_eq!(summary.extra_days, 1);
        assert_eq!(summary.late_hours, 0);
    }

    #[test]
    fn test_lateness_uses_grace_period() {
        let summary = aggregate(&[
            record("2026-01-04", AttendanceStatus::Present, Some("16:10"), None),
            record("2026-01-11", AttendanceStatus::Late, Some("16:11"), None),
            record("2026-01-18", AttendanceStatus::Present, Some("17:45"), None),
        ]);
        assert_eq!(summary.late_hours, 2);
    }

    #[test]
    fn test_overtime_boundaries() {
        let cases = [("20:29", 0), ("20:30", 1), ("21:05", 1), ("22:10", 2)];
        for (check_out, expected) in cases {
            let summary = aggregate(&[record(
                "2026-01-04",
                AttendanceStatus::Present,
                None,
                Some(check_out),
            )]);
            assert_eq!(
                summary.extra_hours, expected,
                "check-out at {} should give {} extra hours",
                check_out, expected
            );
        }
    }

    #[test]
    fn test_early_leave_is_not_overtime() {
        let summary = aggregate(&[record(
            "2026-01-04",
            AttendanceStatus::Present,
            Some("15:50"),
            Some("19:00"),
        )]);
        assert_eq!(summary.extra_hours, 0);
        assert_eq!(summary.late_hours, 0);
    }

    #[test]
    fn test_window_without_bounds_counts_as_scheduled() {
        let schedule = WorkSchedule::new().with_day("الأحد", ScheduleWindow::default());
        let summary = aggregate_attendance(
            &[record(
                "2026-01-04",
                AttendanceStatus::Present,
                Some("19:00"),
                Some("23:00"),
            )],
            "t-1",
            PayMonth::new(1, 2026).unwrap(),
            &schedule,
            &WageRulesConfig::default(),
            &WeekdayNames::default(),
        );
        assert_eq!(summary.extra_days, 0);
        assert_eq!(summary.late_hours, 0);
        assert_eq!(summary.extra_hours, 0);
    }

    #[test]
    fn test_multiplier_comes_from_rules() {
        let rules = WageRulesConfig {
            unpermitted_absence_multiplier: Decimal::new(2, 0),
            ..WageRulesConfig::default()
        };
        let summary = aggregate_attendance(
            &[],
            "t-1",
            PayMonth::new(1, 2026).unwrap(),
            &sunday_schedule(),
            &rules,
            &WeekdayNames::default(),
        );
        assert_eq!(summary.unperm_multiplier, Decimal::new(2, 0));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let records = vec![
            record("2026-01-04", AttendanceStatus::Late, Some("16:30"), Some("21:00")),
            record("2026-01-05", AttendanceStatus::Present, None, None),
            record("2026-01-11", AttendanceStatus::Absent, None, None),
        ];
        assert_eq!(aggregate(&records), aggregate(&records));
    }
}
