//! Salary generation and persistence.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{TeacherSalary, calculate_teacher_salary};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, ClassSession, PayMonth, SalaryRecord, SalaryStatus, Teacher,
};
use crate::store::{Collection, DataStore, fetch_all, fetch_one, row_id, to_row};

/// Generates and stores salary records.
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn DataStore>,
    config: Arc<ConfigLoader>,
}

impl PayrollService {
    /// Creates a service over `store` using `config`.
    pub fn new(store: Arc<dyn DataStore>, config: Arc<ConfigLoader>) -> Self {
        Self { store, config }
    }

    /// Generates a teacher's salary for `period` and persists it.
    ///
    /// The teacher profile, all classes and all attendance records are
    /// fetched concurrently. An existing pending record for the same teacher
    /// and month is replaced; a paid one is left untouched and the call fails
    /// with a validation error.
    pub async fn generate_teacher_salary(
        &self,
        teacher_id: &str,
        period: PayMonth,
    ) -> EngineResult<TeacherSalary> {
        let period = period.validate()?;
        if teacher_id.trim().is_empty() {
            return Err(EngineError::validation("teacher_id", "must not be empty"));
        }

        let store = self.store.as_ref();
        let (teacher, classes, attendance, salaries) = tokio::try_join!(
            fetch_one::<Teacher>(store, Collection::Profiles, teacher_id),
            fetch_all::<ClassSession>(store, Collection::Classes),
            fetch_all::<AttendanceRecord>(store, Collection::TeacherAttendance),
            fetch_all::<SalaryRecord>(store, Collection::Salaries),
        )?;

        let mut salary =
            calculate_teacher_salary(&teacher, &classes, &attendance, period, self.config.config());

        let existing = salaries.iter().find(|s| {
            s.role.is_teacher()
                && s.employee_id.as_deref() == Some(teacher_id)
                && s.period() == Some(period)
        });

        let stored = match existing {
            Some(previous) if previous.status == SalaryStatus::Paid => {
                warn!(teacher_id, period = %period, "Salary already paid, not regenerating");
                return Err(EngineError::validation(
                    "period",
                    format!("salary for {} is already paid", period),
                ));
            }
            Some(previous) => {
                salary.record.id = previous.id.clone();
                self.save_salary(salary.record.clone()).await?
            }
            None => self.save_salary(salary.record.clone()).await?,
        };

        info!(
            teacher_id,
            period = %period,
            base_salary = %stored.base_salary(),
            final_amount = %stored.final_amount(),
            "Generated teacher salary"
        );
        salary.record = stored;
        Ok(salary)
    }

    /// Validates and stores a salary record.
    ///
    /// The employee name is required and amounts must not be negative. The
    /// final amount is recomputed before writing. Records with an id are
    /// updated, others are created.
    pub async fn save_salary(&self, mut record: SalaryRecord) -> EngineResult<SalaryRecord> {
        validate_salary(&record)?;
        record.set_amounts(record.base_salary(), record.bonuses(), record.deductions());

        let row = to_row(Collection::Salaries, &record)?;
        let stored = match record.id.clone() {
            Some(id) => {
                debug!(id = %id, "Updating salary");
                self.store.update(Collection::Salaries, &id, row).await?
            }
            None => {
                debug!(employee = %record.employee_name, "Creating salary");
                self.store.create(Collection::Salaries, row).await?
            }
        };

        let mut saved: SalaryRecord = serde_json::from_value(stored.clone())
            .map_err(|e| EngineError::store(Collection::Salaries.table_name(), "decode", e.to_string()))?;
        if saved.id.is_none() {
            saved.id = row_id(&stored);
        }
        Ok(saved)
    }

    /// Flips a salary between pending and paid.
    pub async fn toggle_status(&self, id: &str) -> EngineResult<SalaryRecord> {
        let record: SalaryRecord = fetch_one(self.store.as_ref(), Collection::Salaries, id).await?;
        let status = record.status.toggled();
        let stored = self
            .store
            .update(
                Collection::Salaries,
                id,
                serde_json::json!({ "status": status }),
            )
            .await?;
        serde_json::from_value(stored)
            .map_err(|e| EngineError::store(Collection::Salaries.table_name(), "decode", e.to_string()))
    }
}

fn validate_salary(record: &SalaryRecord) -> EngineResult<()> {
    if record.employee_name.trim().is_empty() {
        return Err(EngineError::validation("employee_name", "is required"));
    }
    for (field, amount) in [
        ("base_salary", record.base_salary()),
        ("bonuses", record.bonuses()),
        ("deductions", record.deductions()),
    ] {
        if amount < Decimal::ZERO {
            return Err(EngineError::validation(field, "must not be negative"));
        }
    }
    Ok(())
}
