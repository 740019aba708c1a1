//! Core data models for the center payroll engine.
//!
//! This module contains the records read from the backing store and the
//! small value types shared by the calculation layer.

mod attendance;
mod audit;
mod class_session;
mod finance;
pub mod lenient;
mod money;
mod people;
mod period;
mod salary;

pub use attendance::{AttendanceRecord, AttendanceStatus, ScheduleWindow, WorkSchedule};
pub use audit::AuditStep;
pub use class_session::ClassSession;
pub use finance::{OtherExpense, PaymentType, StudentPayment};
pub use money::{non_negative, round_whole, round2};
pub use people::{Student, Teacher};
pub use period::PayMonth;
pub use salary::{Role, SalaryRecord, SalaryStatus};
