//! Recording student payments and operating expenses.

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{OtherExpense, StudentPayment};
use crate::store::{Collection, DataStore, to_row};

fn validate_payment(payment: &StudentPayment) -> EngineResult<()> {
    if payment.student_name.trim().is_empty() {
        return Err(EngineError::validation("student_name", "is required"));
    }
    if payment.amount <= Decimal::ZERO {
        return Err(EngineError::validation("amount", "must be greater than zero"));
    }
    if payment.teacher_ratio < Decimal::ZERO {
        return Err(EngineError::validation("teacher_ratio", "must not be negative"));
    }
    if payment.teacher_ratio > payment.amount {
        return Err(EngineError::validation(
            "teacher_ratio",
            "must not exceed the amount paid",
        ));
    }
    if let (Some(number), Some(total)) = (payment.installment_number, payment.installments_total) {
        if number == 0 || number > total {
            return Err(EngineError::validation(
                "installment_number",
                format!("must be between 1 and {}", total),
            ));
        }
    }
    Ok(())
}

fn validate_expense(expense: &OtherExpense) -> EngineResult<()> {
    if expense.description.trim().is_empty() {
        return Err(EngineError::validation("description", "is required"));
    }
    if expense.amount <= Decimal::ZERO {
        return Err(EngineError::validation("amount", "must be greater than zero"));
    }
    Ok(())
}

/// Validates and stores a student payment.
///
/// Validation happens before any store call. The remaining balance is
/// clamped at zero before writing.
pub async fn record_payment(
    store: &dyn DataStore,
    mut payment: StudentPayment,
) -> EngineResult<serde_json::Value> {
    validate_payment(&payment)?;
    payment.remaining_amount = payment.remaining_balance();

    let row = to_row(Collection::StudentExpenses, &payment)?;
    let stored = store.create(Collection::StudentExpenses, row).await?;
    info!(
        student = %payment.student_name,
        amount = %payment.amount,
        teacher_ratio = %payment.teacher_ratio,
        "Recorded student payment"
    );
    Ok(stored)
}

/// Validates and stores an operating expense.
pub async fn record_expense(
    store: &dyn DataStore,
    expense: OtherExpense,
) -> EngineResult<serde_json::Value> {
    validate_expense(&expense)?;

    let row = to_row(Collection::OtherExpenses, &expense)?;
    let stored = store.create(Collection::OtherExpenses, row).await?;
    info!(
        description = %expense.description,
        amount = %expense.amount,
        "Recorded expense"
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentType;
    use crate::store::InMemoryStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_valid_payment_is_stored() {
        let store = InMemoryStore::new();
        let mut payment = StudentPayment::new("مريم", dec("300"), dec("120"));
        payment.remaining_amount = dec("-5");
        let row = record_payment(&store, payment).await.unwrap();
        assert_eq!(row["remaining_amount"], "0");
        assert_eq!(store.get_all(Collection::StudentExpenses).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_payments_never_reach_the_store() {
        let store = InMemoryStore::new();
        let cases = [
            (StudentPayment::new(" ", dec("10"), dec("0")), "student_name"),
            (StudentPayment::new("x", dec("0"), dec("0")), "amount"),
            (StudentPayment::new("x", dec("10"), dec("11")), "teacher_ratio"),
            (StudentPayment::new("x", dec("10"), dec("-1")), "teacher_ratio"),
        ];
        for (payment, expected_field) in cases {
            match record_payment(&store, payment).await {
                Err(EngineError::Validation { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
        assert!(store.get_all(Collection::StudentExpenses).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_installment_number_must_fit_total() {
        let store = InMemoryStore::new();
        let mut payment = StudentPayment::new("x", dec("100"), dec("10"));
        payment.payment_type = PaymentType::Installment;
        payment.installment_number = Some(4);
        payment.installments_total = Some(3);
        assert!(matches!(
            record_payment(&store, payment).await,
            Err(EngineError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_expense_validation() {
        let store = InMemoryStore::new();
        assert!(record_expense(&store, OtherExpense::new("", dec("5"))).await.is_err());
        assert!(record_expense(&store, OtherExpense::new("rent", dec("0"))).await.is_err());
        record_expense(&store, OtherExpense::new("rent", dec("1500"))).await.unwrap();
        assert_eq!(store.get_all(Collection::OtherExpenses).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = InMemoryStore::new();
        store.set_read_only(true);
        assert!(matches!(
            record_expense(&store, OtherExpense::new("rent", dec("10"))).await,
            Err(EngineError::Store { .. })
        ));
    }
}
