//! Request types for the center payroll API.
//!
//! The calculation endpoints take the rows they work on in the request body,
//! in the same shape the store holds them. The store-backed endpoints only
//! take identifiers and the month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::AttendanceSummary;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, ClassSession, OtherExpense, PayMonth, SalaryRecord, Student,
    StudentPayment, Teacher, WorkSchedule,
};

/// A calendar month as sent by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthRequest {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

impl MonthRequest {
    /// Validates the month and converts it.
    pub fn period(self) -> EngineResult<PayMonth> {
        PayMonth::new(self.month, self.year)
    }
}

/// Request body for `POST /attendance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummaryRequest {
    /// Teacher whose records are counted.
    pub teacher_id: String,
    /// Month to count.
    #[serde(flatten)]
    pub period: MonthRequest,
    /// Attendance rows; rows of other teachers or months are ignored.
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
    /// The teacher's weekly schedule.
    #[serde(default)]
    pub schedule: WorkSchedule,
    /// Overrides the configured unpermitted-absence multiplier.
    #[serde(default)]
    pub unperm_multiplier: Option<Decimal>,
}

/// Request body for `POST /payroll/wages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageRulesRequest {
    /// One day's pay.
    pub base_salary: Decimal,
    /// Attendance counts.
    pub summary: AttendanceSummary,
}

/// Request body for `POST /payroll/class-wage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWageRequest {
    /// Teacher whose classes are priced.
    pub teacher_id: String,
    /// Class rows; classes of other teachers are ignored.
    #[serde(default)]
    pub classes: Vec<ClassSession>,
}

/// Request body for `POST /payroll/teacher-salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSalaryRequest {
    /// The teacher profile, including the work schedule.
    pub teacher: Teacher,
    /// Month to pay.
    #[serde(flatten)]
    pub period: MonthRequest,
    /// Class rows.
    #[serde(default)]
    pub classes: Vec<ClassSession>,
    /// Attendance rows.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

/// Request body for `POST /finance/rollup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupRequest {
    /// Month to total.
    #[serde(flatten)]
    pub period: MonthRequest,
    /// Restricts the totals to one branch.
    #[serde(default)]
    pub branch: Option<String>,
    /// Student payment rows.
    #[serde(default)]
    pub payments: Vec<StudentPayment>,
    /// Salary rows.
    #[serde(default)]
    pub salaries: Vec<SalaryRecord>,
    /// Operating expense rows.
    #[serde(default)]
    pub expenses: Vec<OtherExpense>,
}

/// Request body for `POST /finance/ledger`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRequest {
    /// Student payment rows.
    #[serde(default)]
    pub payments: Vec<StudentPayment>,
    /// Student rows, used to find each payment's teacher.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Salary rows.
    #[serde(default)]
    pub salaries: Vec<SalaryRecord>,
    /// Teacher profiles.
    #[serde(default)]
    pub teachers: Vec<Teacher>,
}

/// Query string for `GET /finance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
    /// Restricts the totals to one branch.
    #[serde(default)]
    pub branch: Option<String>,
}

/// Request body for `POST /salaries/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSalaryRequest {
    /// Teacher profile id.
    pub teacher_id: String,
    /// Month to pay.
    #[serde(flatten)]
    pub period: MonthRequest,
}
