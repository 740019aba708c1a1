//! Keeping views in step with the store.
//!
//! [`FinanceMonitor`] recomputes the finance summary when the finance tables
//! change. [`SalaryBoard`] applies salary edits optimistically and reconciles
//! by re-fetching when a commit fails.

mod finance_monitor;
mod salary_board;

pub use finance_monitor::{FinanceMonitor, FinanceSnapshot, MonitorHandle, RefreshTrigger};
pub use salary_board::{BoardEvent, SalaryBoard, SalaryCommand};
