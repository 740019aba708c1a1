//! Audit trail of rule applications.
//!
//! Salary generation records one [`AuditStep`] per rule it applies (class
//! wage, attendance counts, deductions, bonuses) so an administrator can see
//! how a payout was reached.

use serde::{Deserialize, Serialize};

/// One rule applied while computing a salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Position in the trail, starting at 1.
    pub step_number: u32,
    /// Stable rule key, e.g. `attendance_deductions`.
    pub rule_id: String,
    /// Display name of the rule.
    pub rule_name: String,
    /// Figures the rule read.
    pub input: serde_json::Value,
    /// Figures the rule produced.
    pub output: serde_json::Value,
    /// One-line explanation shown next to the figures.
    pub reasoning: String,
}
