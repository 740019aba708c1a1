//! Calculation logic for the center payroll engine.
//!
//! This module contains the pure computations behind the dashboard's payroll
//! and finance views: attendance aggregation, the teacher wage rules, the
//! class-based base salary, teacher salary generation, the monthly financial
//! roll-up with vault balance, and the teacher account ledger. None of these
//! functions perform I/O or fail; missing numeric input has already been
//! coerced to zero by the models.

mod attendance;
mod class_wage;
mod ledger;
mod payroll;
mod rollup;
mod wage_rules;

pub use attendance::{AttendanceSummary, aggregate_attendance};
pub use class_wage::{ClassWageLine, ClassWageResult, calculate_class_wage};
pub use ledger::{LedgerEntry, TeacherLedger, teacher_ledger};
pub use payroll::{TeacherSalary, calculate_teacher_salary};
pub use rollup::{MonthlyRollup, monthly_rollup, vault_balance};
pub use wage_rules::{WageAdjustment, apply_wage_rules};
