//! Student payments and operating expenses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::money::non_negative;

/// How a student pays their fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// One installment of a larger fee.
    Installment,
    /// The whole fee at once. Unknown stored values read as full.
    #[default]
    #[serde(other)]
    Full,
}

/// A payment received from a student.
///
/// Stored in the `studentExpenses` collection. `teacher_ratio` is the part of
/// the payment the teacher has earned and is independent of `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPayment {
    /// Store identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// The paying student.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub student_id: Option<String>,
    /// Display name of the student.
    #[serde(default, deserialize_with = "lenient::string")]
    pub student_name: String,
    /// Amount received.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
    /// The teacher's earned share of this payment.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub teacher_ratio: Decimal,
    /// Day the payment was received.
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
    /// Branch that received the payment.
    #[serde(default)]
    pub branch: Option<String>,
    /// Full payment or installment.
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Which installment this is (1-based).
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub installment_number: Option<u32>,
    /// How many installments the fee is split into.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub installments_total: Option<u32>,
    /// What the student still owes after this payment.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub remaining_amount: Decimal,
}

impl StudentPayment {
    /// Creates a full payment.
    pub fn new(student_name: impl Into<String>, amount: Decimal, teacher_ratio: Decimal) -> Self {
        Self {
            id: None,
            student_id: None,
            student_name: student_name.into(),
            amount,
            teacher_ratio,
            date: None,
            branch: None,
            payment_type: PaymentType::Full,
            installment_number: None,
            installments_total: None,
            remaining_amount: Decimal::ZERO,
        }
    }

    /// Remaining balance for display, never below zero.
    pub fn remaining_balance(&self) -> Decimal {
        non_negative(self.remaining_amount)
    }
}

/// An operating cost outside payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherExpense {
    /// Store identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// What the money was spent on.
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Amount spent.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
    /// Expense category (rent, utilities, ...).
    #[serde(default)]
    pub category: Option<String>,
    /// Branch that spent it.
    #[serde(default)]
    pub branch: Option<String>,
    /// Day of the expense.
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
}

impl OtherExpense {
    /// Creates an expense.
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: None,
            description: description.into(),
            amount,
            category: None,
            branch: None,
            date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_installment_payment() {
        let json = r#"{
            "id": "p-1",
            "student_id": "s-1",
            "student_name": "مريم",
            "amount": "300",
            "teacher_ratio": 120,
            "date": "2026-02-03",
            "payment_type": "installment",
            "installment_number": 2,
            "installments_total": "3",
            "remaining_amount": -20
        }"#;
        let payment: StudentPayment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.amount, Decimal::new(300, 0));
        assert_eq!(payment.teacher_ratio, Decimal::new(120, 0));
        assert_eq!(payment.payment_type, PaymentType::Installment);
        assert_eq!(payment.installments_total, Some(3));
        assert_eq!(payment.remaining_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_null_amounts_become_zero() {
        let json = r#"{"student_name": "x", "amount": null, "teacher_ratio": "--"}"#;
        let payment: StudentPayment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.amount, Decimal::ZERO);
        assert_eq!(payment.teacher_ratio, Decimal::ZERO);
        assert_eq!(payment.payment_type, PaymentType::Full);
    }

    #[test]
    fn test_unknown_payment_type_reads_as_full() {
        let json = r#"{"student_name": "x", "amount": 100, "payment_type": "monthly"}"#;
        let payment: StudentPayment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.payment_type, PaymentType::Full);
    }

    #[test]
    fn test_deserialize_expense() {
        let json = r#"{"description": "إيجار", "amount": "1500.5", "date": "2026-02-01"}"#;
        let expense: OtherExpense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.amount, Decimal::new(15005, 1));
        assert!(expense.category.is_none());
    }
}
