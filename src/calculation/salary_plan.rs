//! Salary plan evaluation.
//!
//! A plan is evaluated as a left fold over its blocks. Each block writes into a
//! shared accumulator, so a later block of the same type overwrites what an
//! earlier one wrote. Historical plans depend on that ordering.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    AuditStep, BasicSalaryConfig, CommissionConfig, DynamicField, FixedAmountConfig, SalaryPlan,
    SalaryPlanBlock, SalaryPlanConfig, SalaryCalculationResult, TierConfig,
};

/// Base salary of the legacy default plan.
pub const DEFAULT_BASE_SALARY: i64 = 2000;

/// Commission threshold of the legacy default plan.
pub const DEFAULT_COMMISSION_THRESHOLD: i64 = 4000;

/// Bonus for the 15000 sales tier of the legacy default plan.
///
/// Historically sourced from the milliseconds-per-second constant. Payroll
/// history depends on the literal value; confirm with payroll before changing.
pub const TOP_TIER_BONUS: i64 = 1000;

/// Commission rate of the legacy default plan (20%).
pub fn default_commission_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Rounds to the nearest whole unit, with halves going toward positive infinity.
///
/// This matches the rounding used by the historical payroll screens, so
/// `-2.5` rounds to `-2` and `2.5` rounds to `3`. Values at the edge of the
/// `Decimal` range saturate instead of overflowing.
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.saturating_add(Decimal::new(5, 1)).floor()
}

/// The result of evaluating a plan, including the audit trace.
#[derive(Debug, Clone)]
pub struct SalaryBreakdown {
    /// The salary breakdown.
    pub result: SalaryCalculationResult,
    /// One step per processed block, then one for the final aggregation.
    pub audit_steps: Vec<AuditStep>,
}

#[derive(Debug, Default)]
struct Accumulator {
    basic_salary: Decimal,
    commission: Decimal,
    target_bonus: Decimal,
}

/// Evaluates a salary plan against a sales figure.
///
/// See [`calculate_salary_with_trace`] for the rules. `deductions` is accepted
/// for call-site compatibility but does not affect any total.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::{calculate_salary_from_plan, default_salary_plan_config};
/// use rust_decimal::Decimal;
///
/// let plan = default_salary_plan_config();
/// let result = calculate_salary_from_plan(Decimal::from(5000), &plan, &[], &[]);
/// assert_eq!(result.basic_salary, Decimal::from(2000));
/// assert_eq!(result.commission, Decimal::from(200));
/// assert_eq!(result.total, Decimal::from(2200));
/// ```
pub fn calculate_salary_from_plan(
    sales: Decimal,
    plan_config: &SalaryPlanConfig,
    deductions: &[DynamicField],
    bonuses: &[DynamicField],
) -> SalaryCalculationResult {
    calculate_salary_with_trace(sales, plan_config, deductions, bonuses).result
}

/// Evaluates a salary plan and records an audit step for every decision.
///
/// Blocks are processed in order:
/// - `basic_salary` sets the basic salary and, if any tier's `sales_target` is
///   met, the bonus of the highest such tier.
/// - `commission` sets `round((sales - threshold) * rate)` when sales strictly
///   exceed the threshold, and is a no-op otherwise.
/// - `fixed_amount` replaces the basic salary (`basicSalary`, then `amount`).
/// - Unknown block types are skipped.
///
/// Ad-hoc bonuses are summed and rounded, then the grand total is rounded
/// again. Missing values count as zero. The function never fails.
pub fn calculate_salary_with_trace(
    sales: Decimal,
    plan_config: &SalaryPlanConfig,
    _deductions: &[DynamicField],
    bonuses: &[DynamicField],
) -> SalaryBreakdown {
    let mut audit_steps = Vec::with_capacity(plan_config.blocks.len() + 1);

    let acc = plan_config
        .blocks
        .iter()
        .fold(Accumulator::default(), |acc, block| {
            let step_number = audit_steps.len() as u32 + 1;
            let (next, step) = apply_block(acc, block, sales, step_number);
            audit_steps.push(step);
            next
        });

    let bonus_sum = bonuses
        .iter()
        .fold(Decimal::ZERO, |sum, b| sum.saturating_add(b.amount));
    let total_bonuses = round_to_unit(bonus_sum);
    let total = round_to_unit(
        acc.basic_salary
            .saturating_add(acc.commission)
            .saturating_add(acc.target_bonus)
            .saturating_add(total_bonuses),
    );

    audit_steps.push(AuditStep {
        step_number: audit_steps.len() as u32 + 1,
        rule_id: "aggregate".to_string(),
        rule_name: "Salary Total".to_string(),
        input: serde_json::json!({
            "basic_salary": acc.basic_salary.normalize().to_string(),
            "commission": acc.commission.normalize().to_string(),
            "target_bonus": acc.target_bonus.normalize().to_string(),
            "bonus_items": bonuses.len(),
        }),
        output: serde_json::json!({
            "total_bonuses": total_bonuses.normalize().to_string(),
            "total": total.normalize().to_string(),
        }),
        reasoning: format!(
            "{} + {} + {} + {} = {}",
            acc.basic_salary.normalize(),
            acc.commission.normalize(),
            acc.target_bonus.normalize(),
            total_bonuses.normalize(),
            total.normalize()
        ),
    });

    debug!(
        plan = %plan_config.name,
        sales = %sales,
        total = %total,
        "Calculated salary from plan"
    );

    SalaryBreakdown {
        result: SalaryCalculationResult {
            basic_salary: acc.basic_salary,
            commission: acc.commission,
            target_bonus: acc.target_bonus,
            total_bonuses,
            total,
        },
        audit_steps,
    }
}

fn apply_block(
    mut acc: Accumulator,
    block: &SalaryPlanBlock,
    sales: Decimal,
    step_number: u32,
) -> (Accumulator, AuditStep) {
    let step = match block {
        SalaryPlanBlock::BasicSalary(config) => apply_basic_salary(&mut acc, config, sales),
        SalaryPlanBlock::Commission(config) => apply_commission(&mut acc, config, sales),
        SalaryPlanBlock::FixedAmount(config) => apply_fixed_amount(&mut acc, config),
        SalaryPlanBlock::Unknown { kind, .. } => AuditStep {
            step_number: 0,
            rule_id: kind.clone(),
            rule_name: "Unknown Block".to_string(),
            input: serde_json::Value::Null,
            output: serde_json::json!({ "applied": false }),
            reasoning: format!("Block type '{}' is not supported and was skipped", kind),
        },
    };
    (acc, AuditStep { step_number, ..step })
}

fn apply_basic_salary(acc: &mut Accumulator, config: &BasicSalaryConfig, sales: Decimal) -> AuditStep {
    acc.basic_salary = config.base_salary.unwrap_or_default();

    let reached = highest_tier_reached(&config.tiered_bonus, sales);
    if let Some(tier) = reached {
        acc.target_bonus = tier.bonus.unwrap_or_default();
    }

    let reasoning = match reached {
        Some(tier) => format!(
            "Base salary {}; sales {} reached the {} tier, bonus {}",
            acc.basic_salary.normalize(),
            sales.normalize(),
            tier.sales_target.unwrap_or_default().normalize(),
            acc.target_bonus.normalize()
        ),
        None => format!(
            "Base salary {}; sales {} reached no bonus tier",
            acc.basic_salary.normalize(),
            sales.normalize()
        ),
    };

    AuditStep {
        step_number: 0,
        rule_id: "basic_salary".to_string(),
        rule_name: "Basic Salary".to_string(),
        input: serde_json::json!({
            "sales": sales.normalize().to_string(),
            "tiers": config.tiered_bonus.len(),
        }),
        output: serde_json::json!({
            "basic_salary": acc.basic_salary.normalize().to_string(),
            "target_bonus": acc.target_bonus.normalize().to_string(),
            "tier_reached": reached.is_some(),
        }),
        reasoning,
    }
}

/// Picks the tier with the highest `sales_target` that `sales` meets or exceeds.
fn highest_tier_reached(tiers: &[TierConfig], sales: Decimal) -> Option<&TierConfig> {
    let mut sorted: Vec<&TierConfig> = tiers.iter().collect();
    sorted.sort_by(|a, b| {
        b.sales_target
            .unwrap_or_default()
            .cmp(&a.sales_target.unwrap_or_default())
    });
    sorted
        .into_iter()
        .find(|tier| tier.sales_target.unwrap_or_default() <= sales)
}

fn apply_commission(acc: &mut Accumulator, config: &CommissionConfig, sales: Decimal) -> AuditStep {
    let threshold = config.threshold.unwrap_or_default();
    let rate = config.rate.unwrap_or_default();
    let earned = sales > threshold;

    if earned {
        acc.commission = round_to_unit(sales.saturating_sub(threshold).saturating_mul(rate));
    }

    AuditStep {
        step_number: 0,
        rule_id: "commission".to_string(),
        rule_name: "Commission".to_string(),
        input: serde_json::json!({
            "sales": sales.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "rate": rate.normalize().to_string(),
        }),
        output: serde_json::json!({
            "commission": acc.commission.normalize().to_string(),
            "applied": earned,
        }),
        reasoning: if earned {
            format!(
                "({} - {}) x {} = {}",
                sales.normalize(),
                threshold.normalize(),
                rate.normalize(),
                acc.commission.normalize()
            )
        } else {
            format!(
                "Sales {} do not exceed threshold {}",
                sales.normalize(),
                threshold.normalize()
            )
        },
    }
}

fn apply_fixed_amount(acc: &mut Accumulator, config: &FixedAmountConfig) -> AuditStep {
    acc.basic_salary = config.basic_salary.or(config.amount).unwrap_or_default();

    AuditStep {
        step_number: 0,
        rule_id: "fixed_amount".to_string(),
        rule_name: "Fixed Amount".to_string(),
        input: serde_json::json!({
            "amount": config.amount.map(|a| a.normalize().to_string()),
            "basicSalary": config.basic_salary.map(|a| a.normalize().to_string()),
        }),
        output: serde_json::json!({
            "basic_salary": acc.basic_salary.normalize().to_string(),
        }),
        reasoning: format!("Fixed salary of {}", acc.basic_salary.normalize()),
    }
}

/// The legacy plan used for employees without an assigned plan.
///
/// Basic salary 2000 with tiers 7000→200, 10000→350, 12000→500 and
/// 15000→[`TOP_TIER_BONUS`], plus 20% commission above 4000.
pub fn default_salary_plan_config() -> SalaryPlanConfig {
    let tier = |target: i64, bonus: i64| TierConfig {
        sales_target: Some(Decimal::from(target)),
        bonus: Some(Decimal::from(bonus)),
    };

    SalaryPlanConfig {
        name: "Default".to_string(),
        description: "Legacy plan for employees without an assigned salary plan".to_string(),
        blocks: vec![
            SalaryPlanBlock::BasicSalary(BasicSalaryConfig {
                base_salary: Some(Decimal::from(DEFAULT_BASE_SALARY)),
                tiered_bonus: vec![
                    tier(7000, 200),
                    tier(10000, 350),
                    tier(12000, 500),
                    tier(15000, TOP_TIER_BONUS),
                ],
            }),
            SalaryPlanBlock::Commission(CommissionConfig {
                threshold: Some(Decimal::from(DEFAULT_COMMISSION_THRESHOLD)),
                rate: Some(default_commission_rate()),
            }),
        ],
    }
}

/// Calculates an employee's salary from their assigned plan.
///
/// Falls back to [`default_salary_plan_config`] when no plan, or a plan
/// without a configuration, is assigned.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::calculate_salary;
/// use rust_decimal::Decimal;
///
/// let result = calculate_salary(Decimal::from(7000), &[], &[], None);
/// assert_eq!(result.target_bonus, Decimal::from(200));
/// assert_eq!(result.commission, Decimal::from(600));
/// ```
pub fn calculate_salary(
    sales: Decimal,
    deductions: &[DynamicField],
    bonuses: &[DynamicField],
    salary_plan: Option<&SalaryPlan>,
) -> SalaryCalculationResult {
    match salary_plan.and_then(|plan| plan.config.as_ref()) {
        Some(config) => calculate_salary_from_plan(sales, config, deductions, bonuses),
        None => {
            debug!(sales = %sales, "No salary plan configured, using default plan");
            calculate_salary_from_plan(sales, &default_salary_plan_config(), deductions, bonuses)
        }
    }
}
