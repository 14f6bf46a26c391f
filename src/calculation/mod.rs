//! Calculation logic for the barbershop engine.
//!
//! This module contains the pure calculation functions: payroll windows and
//! proration, salary plan evaluation, the named preset plans, and service
//! package pricing.

mod package_pricing;
mod payroll_window;
mod preset_plans;
mod salary_plan;

pub use package_pricing::{PackagePrice, calculate_package_price};
pub use payroll_window::{
    active_workday_ratio_for, get_active_workday_ratio, get_payroll_window, parse_date_as_utc,
};
pub use preset_plans::{
    DYNAMIC_BASE_SALARY, DYNAMIC_SALES_THRESHOLD, DYNAMIC_STEP_AMOUNT, DYNAMIC_STEP_SIZE,
    FIXED_PLAN_SALARY, calculate_dynamic_basic_plan, calculate_fixed_plan,
};
pub use salary_plan::{
    DEFAULT_BASE_SALARY, DEFAULT_COMMISSION_THRESHOLD, SalaryBreakdown, TOP_TIER_BONUS,
    calculate_salary, calculate_salary_from_plan, calculate_salary_with_trace,
    default_commission_rate, default_salary_plan_config, round_to_unit,
};
