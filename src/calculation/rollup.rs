//! Monthly financial roll-up and vault balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OtherExpense, PayMonth, SalaryRecord, StudentPayment};

/// Income and outflow totals for one month.
///
/// Teacher salary records are reported in `teacher_salaries` but are not part
/// of `total_out`; teacher payouts are accounted through `teacher_ratio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    /// The month that was rolled up.
    pub period: PayMonth,
    /// Branch filter that was applied, if any.
    pub branch: Option<String>,
    /// Σ payment amount.
    pub total_income: Decimal,
    /// Σ payment teacher_ratio.
    pub total_teacher_accounts: Decimal,
    /// Σ final amount of non-teacher salaries.
    pub admin_salaries: Decimal,
    /// Σ final amount of teacher salaries (informational).
    pub teacher_salaries: Decimal,
    /// Σ other expense amount.
    pub total_expenses: Decimal,
    /// Teacher accounts + admin salaries + expenses.
    pub total_out: Decimal,
    /// Income minus total out.
    pub net: Decimal,
}

fn branch_matches(record_branch: Option<&String>, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) => record_branch.is_some_and(|b| b == wanted),
    }
}

/// Rolls up one month of finance records.
///
/// Payments and expenses are matched on their `date`; salaries on
/// [`SalaryRecord::period`]. Records without a resolvable date are left out.
/// When `branch` is given only records of that branch are included.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::monthly_rollup;
/// use center_payroll::models::{OtherExpense, PayMonth, Role, SalaryRecord, StudentPayment};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayMonth::new(3, 2026).unwrap();
/// let day = NaiveDate::from_ymd_opt(2026, 3, 10);
///
/// let mut first = StudentPayment::new("a", Decimal::new(100, 0), Decimal::new(20, 0));
/// first.date = day;
/// let mut second = StudentPayment::new("b", Decimal::new(200, 0), Decimal::new(30, 0));
/// second.date = day;
/// let admin = SalaryRecord::new("c", Role::Supervisor, Decimal::new(150, 0), Decimal::ZERO, Decimal::ZERO)
///     .for_period(period);
/// let mut rent = OtherExpense::new("rent", Decimal::new(40, 0));
/// rent.date = day;
///
/// let rollup = monthly_rollup(&[first, second], &[admin], &[rent], period, None);
/// assert_eq!(rollup.total_out, Decimal::new(240, 0));
/// assert_eq!(rollup.net, Decimal::new(60, 0));
/// ```
pub fn monthly_rollup(
    payments: &[StudentPayment],
    salaries: &[SalaryRecord],
    expenses: &[OtherExpense],
    period: PayMonth,
    branch: Option<&str>,
) -> MonthlyRollup {
    let month_payments: Vec<&StudentPayment> = payments
        .iter()
        .filter(|p| p.date.is_some_and(|d| period.contains(d)))
        .filter(|p| branch_matches(p.branch.as_ref(), branch))
        .collect();

    let total_income: Decimal = month_payments.iter().map(|p| p.amount).sum();
    let total_teacher_accounts: Decimal = month_payments.iter().map(|p| p.teacher_ratio).sum();

    let mut admin_salaries = Decimal::ZERO;
    let mut teacher_salaries = Decimal::ZERO;
    for salary in salaries
        .iter()
        .filter(|s| s.period() == Some(period))
        .filter(|s| branch_matches(s.branch.as_ref(), branch))
    {
        if salary.role.is_teacher() {
            teacher_salaries += salary.final_amount();
        } else {
            admin_salaries += salary.final_amount();
        }
    }

    let total_expenses: Decimal = expenses
        .iter()
        .filter(|e| e.date.is_some_and(|d| period.contains(d)))
        .filter(|e| branch_matches(e.branch.as_ref(), branch))
        .map(|e| e.amount)
        .sum();

    let total_out = total_teacher_accounts + admin_salaries + total_expenses;

    MonthlyRollup {
        period,
        branch: branch.map(str::to_string),
        total_income,
        total_teacher_accounts,
        admin_salaries,
        teacher_salaries,
        total_expenses,
        total_out,
        net: total_income - total_out,
    }
}

/// All-time cash position: income minus every salary and expense.
///
/// Unlike the monthly roll-up this counts all salaries (teacher salaries
/// included) and ignores dates and branches.
pub fn vault_balance(
    payments: &[StudentPayment],
    salaries: &[SalaryRecord],
    expenses: &[OtherExpense],
) -> Decimal {
    let income: Decimal = payments.iter().map(|p| p.amount).sum();
    let paid_out: Decimal = salaries.iter().map(SalaryRecord::final_amount).sum();
    let spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    income - (paid_out + spent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn march() -> PayMonth {
        PayMonth::new(3, 2026).unwrap()
    }

    fn payment(amount: &str, ratio: &str, on: &str) -> StudentPayment {
        let mut p = StudentPayment::new("student", dec(amount), dec(ratio));
        p.date = date(on);
        p
    }

    fn expense(amount: &str, on: &str) -> OtherExpense {
        let mut e = OtherExpense::new("expense", dec(amount));
        e.date = date(on);
        e
    }

    fn salary(role: Role, amount: &str) -> SalaryRecord {
        SalaryRecord::new("employee", role, dec(amount), Decimal::ZERO, Decimal::ZERO)
            .for_period(march())
    }

    #[test]
    fn test_rollup_totals() {
        let rollup = monthly_rollup(
            &[payment("100", "20", "2026-03-01"), payment("200", "30", "2026-03-31")],
            &[salary(Role::Supervisor, "150")],
            &[expense("40", "2026-03-15")],
            march(),
            None,
        );
        assert_eq!(rollup.total_income, dec("300"));
        assert_eq!(rollup.total_teacher_accounts, dec("50"));
        assert_eq!(rollup.admin_salaries, dec("150"));
        assert_eq!(rollup.total_expenses, dec("40"));
        assert_eq!(rollup.total_out, dec("240"));
        assert_eq!(rollup.net, dec("60"));
    }

    #[test]
    fn test_teacher_salaries_reported_but_not_in_total_out() {
        let rollup = monthly_rollup(
            &[],
            &[salary(Role::Teacher, "500"), salary(Role::Sales, "100")],
            &[],
            march(),
            None,
        );
        assert_eq!(rollup.teacher_salaries, dec("500"));
        assert_eq!(rollup.admin_salaries, dec("100"));
        assert_eq!(rollup.total_out, dec("100"));
        assert_eq!(rollup.net, dec("-100"));
    }

    #[test]
    fn test_other_months_and_undated_records_excluded() {
        let mut undated = payment("999", "1", "2026-03-01");
        undated.date = None;
        let mut other_month_salary = salary(Role::Sales, "70");
        other_month_salary.month = Some(4);

        let rollup = monthly_rollup(
            &[payment("50", "0", "2026-02-28"), undated],
            &[other_month_salary],
            &[expense("10", "2026-04-01")],
            march(),
            None,
        );
        assert_eq!(rollup.total_income, Decimal::ZERO);
        assert_eq!(rollup.admin_salaries, Decimal::ZERO);
        assert_eq!(rollup.total_expenses, Decimal::ZERO);
    }

    #[test]
    fn test_salary_falls_back_to_payment_date() {
        let mut record = SalaryRecord::new("x", Role::Sales, dec("80"), dec("0"), dec("0"));
        record.payment_date = date("2026-03-05");
        let rollup = monthly_rollup(&[], &[record], &[], march(), None);
        assert_eq!(rollup.admin_salaries, dec("80"));
    }

    #[test]
    fn test_branch_filter() {
        let mut north = payment("100", "10", "2026-03-02");
        north.branch = Some("north".to_string());
        let mut south = payment("300", "30", "2026-03-02");
        south.branch = Some("south".to_string());
        let unbranched = payment("1000", "0", "2026-03-02");

        let rollup = monthly_rollup(&[north, south, unbranched], &[], &[], march(), Some("north"));
        assert_eq!(rollup.branch.as_deref(), Some("north"));
        assert_eq!(rollup.total_income, dec("100"));
        assert_eq!(rollup.total_teacher_accounts, dec("10"));
    }

    #[test]
    fn test_vault_balance_counts_everything() {
        let mut undated = payment("100", "0", "2026-01-01");
        undated.date = None;
        let vault = vault_balance(
            &[payment("500", "50", "2025-12-01"), undated],
            &[salary(Role::Teacher, "200"), salary(Role::Supervisor, "150")],
            &[expense("40", "2026-06-01")],
        );
        // 600 - (200 + 150 + 40)
        assert_eq!(vault, dec("210"));
    }

    #[test]
    fn test_salary_without_role_counts_as_admin() {
        let stored: Vec<SalaryRecord> = serde_json::from_value(serde_json::json!([
            { "employee_name": "عامل", "base_salary": 60, "month": 3, "year": 2026 },
            { "employee_name": "مدير", "role": "admin", "base_salary": 40, "month": 3, "year": 2026 }
        ]))
        .unwrap();

        let rollup = monthly_rollup(&[], &stored, &[], march(), None);
        assert_eq!(rollup.admin_salaries, dec("100"));
        assert_eq!(rollup.teacher_salaries, Decimal::ZERO);
        assert_eq!(rollup.net, dec("-100"));
        assert_eq!(vault_balance(&[], &stored, &[]), dec("-100"));
    }

    #[test]
    fn test_empty_inputs() {
        let rollup = monthly_rollup(&[], &[], &[], march(), None);
        assert_eq!(rollup.net, Decimal::ZERO);
        assert_eq!(vault_balance(&[], &[], &[]), Decimal::ZERO);
    }
}
