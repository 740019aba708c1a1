//! Fetching the inputs of the finance views.

use serde_json::Value;

use crate::calculation::{
    MonthlyRollup, TeacherLedger, monthly_rollup, teacher_ledger, vault_balance,
};
use crate::error::EngineResult;
use crate::models::{OtherExpense, PayMonth, SalaryRecord, Student, StudentPayment, Teacher};
use crate::store::{Collection, DataStore, fetch_all};

/// The three finance collections, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinanceInputs {
    /// Rows of `studentExpenses`.
    pub payments: Vec<StudentPayment>,
    /// Rows of `salaries`.
    pub salaries: Vec<SalaryRecord>,
    /// Rows of `otherExpenses`.
    pub expenses: Vec<OtherExpense>,
}

impl FinanceInputs {
    /// Rolls up `period`, optionally for one branch.
    pub fn rollup(&self, period: PayMonth, branch: Option<&str>) -> MonthlyRollup {
        monthly_rollup(&self.payments, &self.salaries, &self.expenses, period, branch)
    }

    /// All-time vault balance.
    pub fn vault(&self) -> rust_decimal::Decimal {
        vault_balance(&self.payments, &self.salaries, &self.expenses)
    }
}

/// Fetches payments, salaries and expenses concurrently.
///
/// Fails as a whole if any of the three fetches fails.
pub async fn fetch_finance_inputs(store: &dyn DataStore) -> EngineResult<FinanceInputs> {
    let (payments, salaries, expenses) = tokio::try_join!(
        fetch_all::<StudentPayment>(store, Collection::StudentExpenses),
        fetch_all::<SalaryRecord>(store, Collection::Salaries),
        fetch_all::<OtherExpense>(store, Collection::OtherExpenses),
    )?;

    Ok(FinanceInputs {
        payments,
        salaries,
        expenses,
    })
}

fn is_teacher_profile(row: &Value) -> bool {
    row.get("role").and_then(Value::as_str) == Some("teacher")
}

/// Fetches the profiles whose role is `teacher`.
pub async fn fetch_teachers(store: &dyn DataStore) -> EngineResult<Vec<Teacher>> {
    let rows = store.get_all(Collection::Profiles).await?;
    Ok(rows
        .into_iter()
        .filter(is_teacher_profile)
        .filter_map(|row| match serde_json::from_value::<Teacher>(row) {
            Ok(teacher) => Some(teacher),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable teacher profile");
                None
            }
        })
        .collect())
}

/// Fetches everything the teacher ledger needs and builds it.
pub async fn load_teacher_ledger(store: &dyn DataStore) -> EngineResult<TeacherLedger> {
    let (inputs, students, teachers) = tokio::try_join!(
        fetch_finance_inputs(store),
        fetch_all::<Student>(store, Collection::Students),
        fetch_teachers(store),
    )?;

    Ok(teacher_ledger(
        &inputs.payments,
        &students,
        &inputs.salaries,
        &teachers,
    ))
}
