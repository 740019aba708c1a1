//! Teacher wage rules.
//!
//! This module converts an [`AttendanceSummary`] and a teacher's base salary
//! into bonus and deduction totals. The base salary is the value of one full
//! working day; the hourly rate is that value divided by the configured
//! hours per day. These rules only apply to the teacher payroll path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::WageRulesConfig;
use crate::models::{AuditStep, round_whole};

use super::attendance::AttendanceSummary;

/// Bonuses and deductions derived from attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageAdjustment {
    /// One day's pay divided by the hours in a day.
    pub hour_rate: Decimal,
    /// Full day's pay per permitted absence.
    pub permission_deduction: Decimal,
    /// Day's pay times the multiplier per unpermitted absence.
    pub unpermitted_deduction: Decimal,
    /// One hour's pay per late arrival.
    pub late_deduction: Decimal,
    /// One hour's pay per overtime hour.
    pub extra_hours_bonus: Decimal,
    /// Full day's pay per unscheduled day worked.
    pub extra_days_bonus: Decimal,
    /// Rounded sum of all deductions.
    pub total_deductions: Decimal,
    /// Rounded sum of all bonuses.
    pub total_bonuses: Decimal,
    /// The audit steps recording each rule.
    pub audit_steps: Vec<AuditStep>,
}

impl WageAdjustment {
    fn zero(base_salary: Decimal, step_number: u32) -> Self {
        Self {
            hour_rate: Decimal::ZERO,
            permission_deduction: Decimal::ZERO,
            unpermitted_deduction: Decimal::ZERO,
            late_deduction: Decimal::ZERO,
            extra_hours_bonus: Decimal::ZERO,
            extra_days_bonus: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_bonuses: Decimal::ZERO,
            audit_steps: vec![AuditStep {
                step_number,
                rule_id: "wage_rules_skipped".to_string(),
                rule_name: "Wage Rules Skipped".to_string(),
                input: serde_json::json!({ "base_salary": base_salary.to_string() }),
                output: serde_json::json!({ "bonuses": "0", "deductions": "0" }),
                reasoning: format!(
                    "Base salary {} is not positive, no bonuses or deductions apply",
                    base_salary.normalize()
                ),
            }],
        }
    }
}

/// Applies the wage rules to one teacher's month.
///
/// - permission deduction = permitted absences × base salary
/// - unpermitted deduction = unpermitted absences × multiplier × base salary
/// - late deduction = late units × hour rate
/// - overtime bonus = extra hours × hour rate
/// - extra day bonus = extra days × base salary
///
/// Totals are rounded to whole amounts. A base salary of zero or less yields
/// zero for both totals.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::{apply_wage_rules, AttendanceSummary};
/// use center_payroll::config::WageRulesConfig;
/// use rust_decimal::Decimal;
///
/// let summary = AttendanceSummary {
///     perm_absent_days: 1,
///     unperm_absent_days: 1,
///     unperm_multiplier: Decimal::new(2, 0),
///     late_hours: 2,
///     extra_hours: 0,
///     extra_days: 0,
/// };
/// let result = apply_wage_rules(Decimal::new(800, 0), &summary, &WageRulesConfig::default(), 1);
/// assert_eq!(result.total_deductions, Decimal::new(2600, 0));
/// ```
pub fn apply_wage_rules(
    base_salary: Decimal,
    summary: &AttendanceSummary,
    rules: &WageRulesConfig,
    step_number: u32,
) -> WageAdjustment {
    if base_salary <= Decimal::ZERO || rules.hours_per_day == 0 {
        return WageAdjustment::zero(base_salary, step_number);
    }

    let hour_rate = base_salary / Decimal::from(rules.hours_per_day);

    let permission_deduction = Decimal::from(summary.perm_absent_days) * base_salary;
    let unpermitted_deduction =
        Decimal::from(summary.unperm_absent_days) * summary.unperm_multiplier * base_salary;
    let late_deduction = Decimal::from(summary.late_hours) * hour_rate;
    let total_deductions =
        round_whole(permission_deduction + unpermitted_deduction + late_deduction);

    let extra_hours_bonus = Decimal::from(summary.extra_hours) * hour_rate;
    let extra_days_bonus = Decimal::from(summary.extra_days) * base_salary;
    let total_bonuses = round_whole(extra_hours_bonus + extra_days_bonus);

    let deduction_step = AuditStep {
        step_number,
        rule_id: "attendance_deductions".to_string(),
        rule_name: "Attendance Deductions".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "hour_rate": hour_rate.normalize().to_string(),
            "perm_absent_days": summary.perm_absent_days,
            "unperm_absent_days": summary.unperm_absent_days,
            "unperm_multiplier": summary.unperm_multiplier.normalize().to_string(),
            "late_hours": summary.late_hours
        }),
        output: serde_json::json!({
            "permission_deduction": permission_deduction.normalize().to_string(),
            "unpermitted_deduction": unpermitted_deduction.normalize().to_string(),
            "late_deduction": late_deduction.normalize().to_string(),
            "total_deductions": total_deductions.normalize().to_string()
        }),
        reasoning: format!(
            "{} permitted absence(s) and {} unpermitted absence(s) at x{} of {} per day, \
             plus {} late arrival(s) at {} per hour",
            summary.perm_absent_days,
            summary.unperm_absent_days,
            summary.unperm_multiplier.normalize(),
            base_salary.normalize(),
            summary.late_hours,
            hour_rate.normalize()
        ),
    };

    let bonus_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "attendance_bonuses".to_string(),
        rule_name: "Attendance Bonuses".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "hour_rate": hour_rate.normalize().to_string(),
            "extra_hours": summary.extra_hours,
            "extra_days": summary.extra_days
        }),
        output: serde_json::json!({
            "extra_hours_bonus": extra_hours_bonus.normalize().to_string(),
            "extra_days_bonus": extra_days_bonus.normalize().to_string(),
            "total_bonuses": total_bonuses.normalize().to_string()
        }),
        reasoning: format!(
            "{} overtime hour(s) at {} per hour and {} unscheduled day(s) at {} per day",
            summary.extra_hours,
            hour_rate.normalize(),
            summary.extra_days,
            base_salary.normalize()
        ),
    };

    WageAdjustment {
        hour_rate,
        permission_deduction,
        unpermitted_deduction,
        late_deduction,
        extra_hours_bonus,
        extra_days_bonus,
        total_deductions,
        total_bonuses,
        audit_steps: vec![deduction_step, bonus_step],
    }
}
