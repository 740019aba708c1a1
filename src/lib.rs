//! Payroll and finance engine for a tutoring center.
//!
//! This crate computes what the center's admin dashboard shows on its payroll
//! and finance pages: monthly attendance counts per teacher, the attendance
//! based bonuses and deductions, class-based teacher salaries, the monthly
//! financial roll-up with the all-time vault balance, and each teacher's
//! running account. Rows are read from and written to a [`store::DataStore`];
//! the [`api`] module serves everything over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod generative;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;
