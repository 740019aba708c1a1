//! Salary records.
//!
//! A [`SalaryRecord`] is one payout to one employee. Its `final_amount` is
//! always derived from base salary, bonuses and deductions: it is recomputed
//! when a record is built, when amounts change, and when a row is read back
//! from the store (any stored `final_amount` is ignored).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::money::round2;
use super::period::PayMonth;

/// The role an employee is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Teaching staff, paid from class hours and attendance.
    Teacher,
    /// Branch supervisor.
    Supervisor,
    /// Sales team member.
    Sales,
    /// Supervisor over all branches.
    GeneralSupervisor,
    /// Missing or unlisted role; counted with administration.
    #[default]
    #[serde(other)]
    Other,
}

impl Role {
    /// Returns true for the teacher role.
    pub fn is_teacher(&self) -> bool {
        *self == Role::Teacher
    }
}

/// Whether a salary has been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryStatus {
    /// Paid out.
    Paid,
    /// Recorded but not paid yet. Unknown stored values read as pending.
    #[default]
    #[serde(other)]
    Pending,
}

impl SalaryStatus {
    /// The other status, used by the dashboard's status toggle.
    pub fn toggled(self) -> Self {
        match self {
            SalaryStatus::Pending => SalaryStatus::Paid,
            SalaryStatus::Paid => SalaryStatus::Pending,
        }
    }
}

/// One salary payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SalaryRow")]
pub struct SalaryRecord {
    /// Store identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stable identifier of the employee (teacher id for teachers).
    pub employee_id: Option<String>,
    /// Display name of the employee.
    pub employee_name: String,
    /// The role the salary is paid for.
    pub role: Role,
    /// Branch the employee works at.
    pub branch: Option<String>,
    /// Pay month, 1 through 12.
    pub month: Option<u32>,
    /// Pay year.
    pub year: Option<i32>,
    /// Day the salary was paid out.
    pub payment_date: Option<NaiveDate>,
    /// Day the record was created.
    pub created_at: Option<NaiveDate>,
    /// Payout status.
    pub status: SalaryStatus,
    /// Structured breakdown of how the amounts were derived.
    pub detailed_finance: Option<serde_json::Value>,
    /// Free-form notes (class breakdown for generated teacher salaries).
    pub notes: Option<String>,
    base_salary: Decimal,
    bonuses: Decimal,
    deductions: Decimal,
    final_amount: Decimal,
}

impl SalaryRecord {
    /// Creates a pending salary record with the given amounts.
    ///
    /// # Example
    ///
    /// ```
    /// use center_payroll::models::{Role, SalaryRecord};
    /// use rust_decimal::Decimal;
    ///
    /// let record = SalaryRecord::new(
    ///     "سارة",
    ///     Role::Supervisor,
    ///     Decimal::new(3000, 0),
    ///     Decimal::new(250, 0),
    ///     Decimal::new(100, 0),
    /// );
    /// assert_eq!(record.final_amount(), Decimal::new(3150, 0));
    /// ```
    pub fn new(
        employee_name: impl Into<String>,
        role: Role,
        base_salary: Decimal,
        bonuses: Decimal,
        deductions: Decimal,
    ) -> Self {
        Self {
            id: None,
            employee_id: None,
            employee_name: employee_name.into(),
            role,
            branch: None,
            month: None,
            year: None,
            payment_date: None,
            created_at: None,
            status: SalaryStatus::Pending,
            detailed_finance: None,
            notes: None,
            base_salary,
            bonuses,
            deductions,
            final_amount: compute_final(base_salary, bonuses, deductions),
        }
    }

    /// Sets the employee id.
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Sets the pay month.
    pub fn for_period(mut self, period: PayMonth) -> Self {
        self.month = Some(period.month);
        self.year = Some(period.year);
        self
    }

    /// Base salary.
    pub fn base_salary(&self) -> Decimal {
        self.base_salary
    }

    /// Total bonuses.
    pub fn bonuses(&self) -> Decimal {
        self.bonuses
    }

    /// Total deductions.
    pub fn deductions(&self) -> Decimal {
        self.deductions
    }

    /// `round2(base_salary + bonuses - deductions)`.
    pub fn final_amount(&self) -> Decimal {
        self.final_amount
    }

    /// Replaces the amounts and recomputes the final amount.
    pub fn set_amounts(&mut self, base_salary: Decimal, bonuses: Decimal, deductions: Decimal) {
        self.base_salary = base_salary;
        self.bonuses = bonuses;
        self.deductions = deductions;
        self.final_amount = compute_final(base_salary, bonuses, deductions);
    }

    /// The month this salary is booked under.
    ///
    /// Explicit month/year fields win; otherwise the payment date, then the
    /// creation date, is used.
    pub fn period(&self) -> Option<PayMonth> {
        if let (Some(month), Some(year)) = (self.month, self.year) {
            if let Ok(period) = PayMonth::new(month, year) {
                return Some(period);
            }
        }
        self.payment_date
            .or(self.created_at)
            .map(PayMonth::of)
    }
}

fn compute_final(base_salary: Decimal, bonuses: Decimal, deductions: Decimal) -> Decimal {
    round2(base_salary + bonuses - deductions)
}

/// Wire shape of a salary row; `final_amount` is accepted but discarded.
#[derive(Deserialize)]
struct SalaryRow {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    employee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    employee_name: String,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    month: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    payment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    created_at: Option<NaiveDate>,
    #[serde(default)]
    status: Option<SalaryStatus>,
    #[serde(default)]
    detailed_finance: Option<serde_json::Value>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    base_salary: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    bonuses: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    deductions: Decimal,
}

impl From<SalaryRow> for SalaryRecord {
    fn from(row: SalaryRow) -> Self {
        Self {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            role: row.role,
            branch: row.branch,
            month: row.month,
            year: row.year,
            payment_date: row.payment_date,
            created_at: row.created_at,
            status: row.status.unwrap_or_default(),
            detailed_finance: row.detailed_finance,
            notes: row.notes,
            base_salary: row.base_salary,
            bonuses: row.bonuses,
            deductions: row.deductions,
            final_amount: compute_final(row.base_salary, row.bonuses, row.deductions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_stored_final_amount_is_ignored() {
        let json = r#"{
            "employee_name": "أحمد",
            "role": "teacher",
            "base_salary": "1000",
            "bonuses": 150.5,
            "deductions": "50.25",
            "final_amount": 999999
        }"#;
        let record: SalaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.final_amount(), dec("1100.25"));
        assert_eq!(record.status, SalaryStatus::Pending);
    }

    #[test]
    fn test_set_amounts_recomputes_final() {
        let mut record = SalaryRecord::new("x", Role::Sales, dec("100"), dec("0"), dec("0"));
        record.set_amounts(dec("100"), dec("10.004"), dec("0"));
        assert_eq!(record.final_amount(), dec("110.00"));
    }

    #[test]
    fn test_final_amount_may_be_negative() {
        let record = SalaryRecord::new("x", Role::Teacher, dec("100"), dec("0"), dec("250"));
        assert_eq!(record.final_amount(), dec("-150"));
    }

    #[test]
    fn test_serialize_includes_final_amount() {
        let record = SalaryRecord::new("x", Role::GeneralSupervisor, dec("10"), dec("5"), dec("1"));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["role"], "general_supervisor");
        assert_eq!(value["final_amount"], "14");
    }

    #[test]
    fn test_period_prefers_explicit_month_and_year() {
        let json = r#"{
            "employee_name": "x",
            "role": "sales",
            "month": "2",
            "year": 2026,
            "payment_date": "2026-03-01"
        }"#;
        let record: SalaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.period(), Some(PayMonth::new(2, 2026).unwrap()));
    }

    #[test]
    fn test_period_falls_back_to_created_at() {
        let json = r#"{
            "employee_name": "x",
            "role": "sales",
            "created_at": "2026-05-20T11:00:00.000Z"
        }"#;
        let record: SalaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.period(), Some(PayMonth::new(5, 2026).unwrap()));
    }

    #[test]
    fn test_period_missing_everywhere() {
        let record = SalaryRecord::new("x", Role::Sales, dec("1"), dec("0"), dec("0"));
        assert!(record.period().is_none());
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let json = r#"{"employee_name": "x", "role": "sales", "status": "archived"}"#;
        let record: SalaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, SalaryStatus::Pending);

        let paid: SalaryRecord =
            serde_json::from_str(r#"{"employee_name": "x", "role": "sales", "status": "paid"}"#)
                .unwrap();
        assert_eq!(paid.status, SalaryStatus::Paid);
    }

    #[test]
    fn test_missing_or_unlisted_role_is_other() {
        let unlisted: SalaryRecord =
            serde_json::from_str(r#"{"employee_name": "x", "role": "admin", "base_salary": 90}"#)
                .unwrap();
        assert_eq!(unlisted.role, Role::Other);
        assert!(!unlisted.role.is_teacher());
        assert_eq!(unlisted.final_amount(), dec("90"));

        let missing: SalaryRecord =
            serde_json::from_str(r#"{"employee_name": "x", "base_salary": 40}"#).unwrap();
        assert_eq!(missing.role, Role::Other);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(SalaryStatus::Pending.toggled(), SalaryStatus::Paid);
        assert_eq!(SalaryStatus::Paid.toggled(), SalaryStatus::Pending);
    }
}
