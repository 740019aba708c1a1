//! Store-backed operations.
//!
//! Services fetch their inputs from a [`DataStore`](crate::store::DataStore),
//! run the pure calculations, and write results back. Inputs are validated
//! before any store call.

mod finance;
mod payments;
mod payroll;

pub use finance::{FinanceInputs, fetch_finance_inputs, fetch_teachers, load_teacher_ledger};
pub use payments::{record_expense, record_payment};
pub use payroll::PayrollService;
