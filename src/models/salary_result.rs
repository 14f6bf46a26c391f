//! Salary calculation result models.
//!
//! This module contains the [`SalaryCalculationResult`] breakdown produced by the
//! salary engine, the [`PresetPlanResult`] of the named preset plans, and the
//! [`AuditStep`] records that explain how a breakdown was reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Breakdown of a monthly salary.
///
/// `commission`, `total_bonuses` and `total` are rounded to whole units.
/// `basic_salary` and `target_bonus` are passed through from the plan as-is.
///
/// # Example
///
/// ```
/// use barbershop_engine::models::SalaryCalculationResult;
/// use rust_decimal::Decimal;
///
/// let result = SalaryCalculationResult {
///     basic_salary: Decimal::from(2000),
///     commission: Decimal::from(200),
///     target_bonus: Decimal::ZERO,
///     total_bonuses: Decimal::ZERO,
///     total: Decimal::from(2200),
/// };
/// assert_eq!(result.total, Decimal::from(2200));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCalculationResult {
    /// Basic (or fixed) salary from the plan.
    pub basic_salary: Decimal,
    /// Commission on sales above the plan threshold.
    pub commission: Decimal,
    /// Bonus for the highest sales tier reached.
    pub target_bonus: Decimal,
    /// Sum of ad-hoc bonus line items.
    pub total_bonuses: Decimal,
    /// Grand total.
    pub total: Decimal,
}

/// Result of one of the named preset plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPlanResult {
    /// The base amount before increments.
    pub basic_salary: Decimal,
    /// Number of full sales increments earned (a whole number).
    pub increments: Decimal,
    /// Final salary.
    pub total_salary: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one block or
/// aggregation of the salary engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied (usually the block type).
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
