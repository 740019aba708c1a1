//! HTTP API module for the center payroll engine.
//!
//! This module provides the REST endpoints behind the dashboard's payroll and
//! finance views: stateless calculation endpoints that take the rows in the
//! request body, and store-backed endpoints that read and persist them.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceSummaryRequest, ClassWageRequest, GenerateSalaryRequest, LedgerRequest,
    MonthRequest, RollupRequest, SummaryQuery, TeacherSalaryRequest, WageRulesRequest,
};
pub use response::{ApiError, ApiErrorResponse, FinanceTotals, GeneratedContent};
pub use state::AppState;
