//! Teacher account ledger.
//!
//! Each teacher earns the `teacher_ratio` of the payments made by students
//! assigned to them and is paid through teacher salary records. Joins use
//! stable ids only: `payment.student_id -> student.teacher_id` for earnings
//! and `salary.employee_id` for payouts.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{SalaryRecord, Student, StudentPayment, Teacher};

/// One teacher's running account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Teacher id.
    pub teacher_id: String,
    /// Teacher display name (empty when the id has no profile).
    pub teacher_name: String,
    /// Σ positive teacher_ratio of payments by the teacher's students.
    pub earned: Decimal,
    /// Σ final amount of the teacher's salary records.
    pub paid: Decimal,
    /// `earned - paid`; negative when the teacher was overpaid.
    pub balance: Decimal,
    /// Number of payments that contributed to `earned`.
    pub payments_count: u32,
}

impl LedgerEntry {
    fn new(teacher_id: &str, teacher_name: &str) -> Self {
        Self {
            teacher_id: teacher_id.to_string(),
            teacher_name: teacher_name.to_string(),
            earned: Decimal::ZERO,
            paid: Decimal::ZERO,
            balance: Decimal::ZERO,
            payments_count: 0,
        }
    }
}

/// The ledger for all teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherLedger {
    /// One entry per teacher, ordered by name then id.
    pub entries: Vec<LedgerEntry>,
    /// Payments with a positive ratio whose teacher could not be resolved.
    pub unresolved_payments: u32,
    /// Σ teacher_ratio of the unresolved payments.
    pub unresolved_ratio_total: Decimal,
}

impl TeacherLedger {
    /// Looks up the entry for `teacher_id`.
    pub fn entry(&self, teacher_id: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.teacher_id == teacher_id)
    }
}

/// Builds the teacher ledger over all periods.
///
/// A payment counts toward a teacher only if its `student_id` names a known
/// student with a `teacher_id`. Payments with a positive ratio that fail that
/// join are counted as unresolved and never reach an entry. Salary records
/// count toward `paid` when their role is teacher and they carry an
/// `employee_id`.
///
/// # Example
///
/// ```
/// use center_payroll::calculation::teacher_ledger;
/// use center_payroll::models::{Student, StudentPayment, Teacher};
/// use rust_decimal::Decimal;
///
/// let teachers = vec![Teacher {
///     id: "t-1".to_string(),
///     full_name: "خالد".to_string(),
///     branch: None,
///     work_schedule: Default::default(),
/// }];
/// let students = vec![Student {
///     id: "s-1".to_string(),
///     full_name: "مريم".to_string(),
///     teacher_id: Some("t-1".to_string()),
///     teacher_name: None,
///     branch: None,
/// }];
/// let mut payment = StudentPayment::new("مريم", Decimal::new(300, 0), Decimal::new(120, 0));
/// payment.student_id = Some("s-1".to_string());
///
/// let ledger = teacher_ledger(&[payment], &students, &[], &teachers);
/// assert_eq!(ledger.entry("t-1").unwrap().balance, Decimal::new(120, 0));
/// ```
pub fn teacher_ledger(
    payments: &[StudentPayment],
    students: &[Student],
    salaries: &[SalaryRecord],
    teachers: &[Teacher],
) -> TeacherLedger {
    let teacher_of_student: HashMap<&str, &str> = students
        .iter()
        .filter_map(|s| s.teacher_id.as_deref().map(|t| (s.id.as_str(), t)))
        .collect();

    let mut entries: BTreeMap<String, LedgerEntry> = teachers
        .iter()
        .map(|t| (t.id.clone(), LedgerEntry::new(&t.id, &t.full_name)))
        .collect();

    let mut unresolved_payments = 0u32;
    let mut unresolved_ratio_total = Decimal::ZERO;

    for payment in payments.iter().filter(|p| p.teacher_ratio > Decimal::ZERO) {
        let teacher_id = payment
            .student_id
            .as_deref()
            .and_then(|sid| teacher_of_student.get(sid).copied());

        match teacher_id {
            Some(teacher_id) => {
                let entry = entries
                    .entry(teacher_id.to_string())
                    .or_insert_with(|| LedgerEntry::new(teacher_id, ""));
                entry.earned += payment.teacher_ratio;
                entry.payments_count += 1;
            }
            None => {
                unresolved_payments += 1;
                unresolved_ratio_total += payment.teacher_ratio;
            }
        }
    }

    for salary in salaries.iter().filter(|s| s.role.is_teacher()) {
        let Some(teacher_id) = salary.employee_id.as_deref() else {
            continue;
        };
        let entry = entries
            .entry(teacher_id.to_string())
            .or_insert_with(|| LedgerEntry::new(teacher_id, &salary.employee_name));
        entry.paid += salary.final_amount();
    }

    let mut entries: Vec<LedgerEntry> = entries
        .into_values()
        .map(|mut entry| {
            entry.balance = entry.earned - entry.paid;
            entry
        })
        .collect();
    entries.sort_by(|a, b| {
        a.teacher_name
            .cmp(&b.teacher_name)
            .then_with(|| a.teacher_id.cmp(&b.teacher_id))
    });

    if unresolved_payments > 0 {
        tracing::warn!(
            unresolved_payments,
            unresolved_ratio_total = %unresolved_ratio_total,
            "Payments could not be attributed to a teacher"
        );
    }

    TeacherLedger {
        entries,
        unresolved_payments,
        unresolved_ratio_total,
    }
}
