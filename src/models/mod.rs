//! Core data models for the barbershop engine.
//!
//! This module contains all the domain models used throughout the engine.

mod booking;
mod package;
mod payroll_window;
mod salary_plan;
mod salary_result;

pub use booking::{
    BookingState, BookingStep, CustomerDetails, LockState, LockTransaction, PersistedBooking,
    SelectedService, StepTransaction, TransactionStatus,
};
pub use package::PackageDiscountTier;
pub use payroll_window::PayrollWindow;
pub use salary_plan::{
    BasicSalaryConfig, CommissionConfig, DynamicField, FixedAmountConfig, SalaryPlan,
    SalaryPlanBlock, SalaryPlanConfig, TierConfig,
};
pub use salary_result::{AuditStep, PresetPlanResult, SalaryCalculationResult};
