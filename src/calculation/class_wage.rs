//! Class-based teacher base salary.
//!
//! A teacher's generated base salary is the sum over the classes currently
//! assigned to them of `duration / 60 × hourly rate`, where the rate comes
//! from the class rate table. The result reflects current assignments only,
//! so regenerating an old month after a schedule change changes its value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ClassRateTable;
use crate::models::{ClassSession, round2};

/// One class's contribution to a teacher's base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassWageLine {
    /// Display name of the class.
    pub class_name: String,
    /// The class type as stored.
    pub class_type: String,
    /// Session length in minutes.
    pub duration_minutes: Decimal,
    /// Hourly rate applied.
    pub rate: Decimal,
    /// False when the class type was not listed and the lowest rate was used.
    pub rate_listed: bool,
    /// `duration / 60 × rate`, unrounded.
    pub cost: Decimal,
}

impl ClassWageLine {
    /// The cost as shown in notes, at most 2 decimals.
    pub fn display_cost(&self) -> Decimal {
        round2(self.cost).normalize()
    }

    /// Human-readable audit line, e.g. `حلقة الفجر: 90m (80/hr) = 120`.
    pub fn describe(&self) -> String {
        format!(
            "{}: {}m ({}/hr) = {}",
            self.class_name,
            self.duration_minutes.normalize(),
            self.rate.normalize(),
            self.display_cost()
        )
    }
}

/// The class-based base salary for one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassWageResult {
    /// Sum of the unrounded class costs, rounded to 2 decimals once.
    pub base_salary: Decimal,
    /// Per-class breakdown.
    pub lines: Vec<ClassWageLine>,
    /// The breakdown as newline-separated audit notes.
    pub notes: String,
}

/// Derives a teacher's base salary from the classes they currently teach.
///
/// Classes are matched on `teacher_id`. Unknown class types are paid at the
/// lowest listed rate.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::calculate_class_wage;
/// use center_payroll::config::ClassRateTable;
/// use center_payroll::models::ClassSession;
/// use rust_decimal::Decimal;
///
/// let classes = vec![ClassSession {
///     id: None,
///     name: "حلقة الفجر".to_string(),
///     teacher_id: "t-1".to_string(),
///     teacher_name: None,
///     class_type: "متون".to_string(),
///     duration_minutes: Decimal::new(90, 0),
/// }];
///
/// let result = calculate_class_wage(&classes, "t-1", &ClassRateTable::default());
/// assert_eq!(result.base_salary, Decimal::new(120, 0));
/// assert_eq!(result.notes, "حلقة الفجر: 90m (80/hr) = 120");
/// ```
pub fn calculate_class_wage(
    classes: &[ClassSession],
    teacher_id: &str,
    rates: &ClassRateTable,
) -> ClassWageResult {
    let sixty = Decimal::from(60);

    let lines: Vec<ClassWageLine> = classes
        .iter()
        .filter(|c| c.teacher_id == teacher_id)
        .map(|class| {
            let (rate, rate_listed) = rates.rate_for(&class.class_type);
            let cost = class.duration_minutes / sixty * rate;
            ClassWageLine {
                class_name: class.name.clone(),
                class_type: class.class_type.clone(),
                duration_minutes: class.duration_minutes,
                rate,
                rate_listed,
                cost,
            }
        })
        .collect();

    let base_salary = round2(lines.iter().map(|l| l.cost).sum());
    let notes = lines
        .iter()
        .map(ClassWageLine::describe)
        .collect::<Vec<_>>()
        .join("\n");

    ClassWageResult {
        base_salary,
        lines,
        notes,
    }
}
