//! Payroll, salary plan and booking wizard engine for a barbershop chain
//!
//! This crate evaluates block-based salary plans against monthly sales,
//! computes the 26th-to-25th payroll window and the active workday ratio, and
//! drives the multi-step customer booking wizard with a lock-guarded step machine.

#![warn(missing_docs)]

pub mod booking;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
