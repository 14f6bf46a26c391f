//! Named preset salary plans.
//!
//! Two self-contained schemes kept alongside the configurable engine: a flat
//! fixed salary and a stepped "dynamic basic" salary.

use rust_decimal::Decimal;

use crate::models::PresetPlanResult;

/// Salary paid by the fixed preset plan.
pub const FIXED_PLAN_SALARY: i64 = 3750;

/// Starting salary of the dynamic basic plan.
pub const DYNAMIC_BASE_SALARY: i64 = 500;

/// Sales above which the dynamic basic plan starts stepping.
pub const DYNAMIC_SALES_THRESHOLD: i64 = 5000;

/// Size of one sales step in the dynamic basic plan.
pub const DYNAMIC_STEP_SIZE: i64 = 400;

/// Amount added per full step in the dynamic basic plan.
pub const DYNAMIC_STEP_AMOUNT: i64 = 50;

/// Flat 3750 salary, independent of sales.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::calculate_fixed_plan;
/// use rust_decimal::Decimal;
///
/// assert_eq!(calculate_fixed_plan().total_salary, Decimal::from(3750));
/// ```
pub fn calculate_fixed_plan() -> PresetPlanResult {
    PresetPlanResult {
        basic_salary: Decimal::from(FIXED_PLAN_SALARY),
        increments: Decimal::ZERO,
        total_salary: Decimal::from(FIXED_PLAN_SALARY),
    }
}

/// Stepped salary: 500 plus 50 for every full 400 of sales above 5000.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::calculate_dynamic_basic_plan;
/// use rust_decimal::Decimal;
///
/// assert_eq!(calculate_dynamic_basic_plan(Decimal::from(5399)).total_salary, Decimal::from(500));
/// assert_eq!(calculate_dynamic_basic_plan(Decimal::from(5400)).total_salary, Decimal::from(550));
/// ```
pub fn calculate_dynamic_basic_plan(sales: Decimal) -> PresetPlanResult {
    let excess = sales.saturating_sub(Decimal::from(DYNAMIC_SALES_THRESHOLD));
    let increments = if excess > Decimal::ZERO {
        (excess / Decimal::from(DYNAMIC_STEP_SIZE)).floor()
    } else {
        Decimal::ZERO
    };

    let basic_salary = Decimal::from(DYNAMIC_BASE_SALARY);
    let step_total = Decimal::from(DYNAMIC_STEP_AMOUNT).saturating_mul(increments);
    PresetPlanResult {
        basic_salary,
        increments,
        total_salary: basic_salary.saturating_add(step_total),
    }
}
