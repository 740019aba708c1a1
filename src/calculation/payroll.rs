//! Teacher salary generation.
//!
//! Combines the class-wage calculator, the attendance aggregator and the wage
//! rules into one [`SalaryRecord`] for a teacher and month. This is the only
//! path that applies the wage rules.

use serde::{Deserialize, Serialize};

use crate::config::CenterConfig;
use crate::models::{
    AttendanceRecord, AuditStep, ClassSession, PayMonth, Role, SalaryRecord, Teacher,
};

use super::attendance::{AttendanceSummary, aggregate_attendance};
use super::class_wage::{ClassWageResult, calculate_class_wage};
use super::wage_rules::{WageAdjustment, apply_wage_rules};

/// A generated teacher salary with everything that went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSalary {
    /// The salary record, ready to persist.
    pub record: SalaryRecord,
    /// Class-based base salary breakdown.
    pub class_wage: ClassWageResult,
    /// Attendance counts for the month.
    pub attendance: AttendanceSummary,
    /// Bonuses and deductions from attendance.
    pub adjustment: WageAdjustment,
    /// Every rule applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Generates one teacher's salary for `period`.
///
/// The base salary comes from the classes currently assigned to the teacher.
/// Attendance in `period` is aggregated against the teacher's schedule and
/// turned into bonuses and deductions. The resulting record carries the class
/// breakdown as `notes` and the attendance figures in `detailed_finance`.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::calculate_teacher_salary;
/// use center_payroll::config::CenterConfig;
/// use center_payroll::models::{ClassSession, PayMonth, Teacher};
/// use rust_decimal::Decimal;
///
/// let teacher = Teacher {
///     id: "t-1".to_string(),
///     full_name: "خالد".to_string(),
///     branch: None,
///     work_schedule: Default::default(),
/// };
/// let classes = vec![ClassSession {
///     id: None,
///     name: "حلقة".to_string(),
///     teacher_id: "t-1".to_string(),
///     teacher_name: None,
///     class_type: "متون".to_string(),
///     duration_minutes: Decimal::new(90, 0),
/// }];
///
/// let salary = calculate_teacher_salary(
///     &teacher,
///     &classes,
///     &[],
///     PayMonth::new(1, 2026).unwrap(),
///     &CenterConfig::default(),
/// );
/// assert_eq!(salary.record.final_amount(), Decimal::new(120, 0));
/// assert_eq!(salary.record.employee_id.as_deref(), Some("t-1"));
/// ```
pub fn calculate_teacher_salary(
    teacher: &Teacher,
    classes: &[ClassSession],
    attendance_records: &[AttendanceRecord],
    period: PayMonth,
    config: &CenterConfig,
) -> TeacherSalary {
    let mut step_number: u32 = 1;
    let mut audit_steps = Vec::new();

    let class_wage = calculate_class_wage(classes, &teacher.id, config.class_rates());
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "class_wage".to_string(),
        rule_name: "Class Wage".to_string(),
        input: serde_json::json!({
            "teacher_id": teacher.id,
            "classes": class_wage.lines.len()
        }),
        output: serde_json::json!({
            "base_salary": class_wage.base_salary.normalize().to_string()
        }),
        reasoning: if class_wage.lines.is_empty() {
            "No classes assigned, base salary is 0".to_string()
        } else {
            class_wage.notes.replace('\n', "; ")
        },
    });
    step_number += 1;

    let attendance = aggregate_attendance(
        attendance_records,
        &teacher.id,
        period,
        &teacher.work_schedule,
        config.wage_rules(),
        config.weekdays(),
    );
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "attendance_summary".to_string(),
        rule_name: "Attendance Summary".to_string(),
        input: serde_json::json!({
            "period": period.to_string(),
            "scheduled_days": teacher.work_schedule.len()
        }),
        output: serde_json::json!(attendance),
        reasoning: format!(
            "{} permitted and {} unpermitted absence(s), {} late, {} overtime hour(s), {} extra day(s)",
            attendance.perm_absent_days,
            attendance.unperm_absent_days,
            attendance.late_hours,
            attendance.extra_hours,
            attendance.extra_days
        ),
    });
    step_number += 1;

    let adjustment = apply_wage_rules(
        class_wage.base_salary,
        &attendance,
        config.wage_rules(),
        step_number,
    );
    audit_steps.extend(adjustment.audit_steps.iter().cloned());

    let mut record = SalaryRecord::new(
        teacher.full_name.clone(),
        Role::Teacher,
        class_wage.base_salary,
        adjustment.total_bonuses,
        adjustment.total_deductions,
    )
    .with_employee_id(teacher.id.clone())
    .for_period(period);
    record.branch = teacher.branch.clone();
    record.notes = (!class_wage.notes.is_empty()).then(|| class_wage.notes.clone());
    record.detailed_finance = Some(serde_json::json!({
        "attendance": attendance,
        "hour_rate": adjustment.hour_rate.normalize().to_string(),
        "permission_deduction": adjustment.permission_deduction.normalize().to_string(),
        "unpermitted_deduction": adjustment.unpermitted_deduction.normalize().to_string(),
        "late_deduction": adjustment.late_deduction.normalize().to_string(),
        "extra_hours_bonus": adjustment.extra_hours_bonus.normalize().to_string(),
        "extra_days_bonus": adjustment.extra_days_bonus.normalize().to_string(),
        "class_lines": class_wage.lines
    }));

    TeacherSalary {
        record,
        class_wage,
        attendance,
        adjustment,
        audit_steps,
    }
}
