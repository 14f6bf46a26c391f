//! Configuration types.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from the configuration directory.

use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{PackageDiscountTier, SalaryPlanConfig};

/// Default lock time-to-live in milliseconds.
pub const DEFAULT_LOCK_TTL_MS: u64 = 5000;

/// Default expiry sweep period in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Longest accepted lock time-to-live (one day) in milliseconds.
pub const MAX_LOCK_TTL_MS: u64 = 86_400_000;

/// Longest accepted sweep period (one hour) in milliseconds.
pub const MAX_SWEEP_INTERVAL_MS: u64 = 3_600_000;

/// Default storage key of the persisted booking blob.
pub const DEFAULT_STORAGE_KEY: &str = "booking-state";

fn default_lock_ttl_ms() -> u64 {
    DEFAULT_LOCK_TTL_MS
}

fn default_sweep_interval_ms() -> u64 {
    DEFAULT_SWEEP_INTERVAL_MS
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Settings for the booking wizard, from `booking.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingConfig {
    /// How long a step-change lock stays valid.
    #[serde(default = "default_lock_ttl_ms")]
    pub lock_ttl_ms: u64,
    /// How often the sweeper checks for expired locks.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Key under which the wizard state is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Discount ladder for service bundles.
    #[serde(default)]
    pub package_discounts: Vec<PackageDiscountTier>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lock_ttl_ms: DEFAULT_LOCK_TTL_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            storage_key: default_storage_key(),
            package_discounts: Vec::new(),
        }
    }
}

impl BookingConfig {
    /// Checks that the timing settings are within their accepted ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_LOCK_TTL_MS).contains(&self.lock_ttl_ms) {
            return Err(format!(
                "lock_ttl_ms must be between 1 and {}, got {}",
                MAX_LOCK_TTL_MS, self.lock_ttl_ms
            ));
        }
        if !(1..=MAX_SWEEP_INTERVAL_MS).contains(&self.sweep_interval_ms) {
            return Err(format!(
                "sweep_interval_ms must be between 1 and {}, got {}",
                MAX_SWEEP_INTERVAL_MS, self.sweep_interval_ms
            ));
        }
        Ok(())
    }

    /// Lock time-to-live as a chrono duration, clamped to `1..=MAX_LOCK_TTL_MS`.
    pub fn lock_ttl(&self) -> chrono::Duration {
        let ms = self.lock_ttl_ms.clamp(1, MAX_LOCK_TTL_MS);
        chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
    }

    /// Sweep period as a std duration, clamped to `1..=MAX_SWEEP_INTERVAL_MS`.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sweep_interval_ms.clamp(1, MAX_SWEEP_INTERVAL_MS))
    }
}

/// The complete engine configuration loaded from a directory.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Booking wizard settings.
    booking: BookingConfig,
    /// Salary plans keyed by file stem.
    plans: HashMap<String, SalaryPlanConfig>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(booking: BookingConfig, plans: HashMap<String, SalaryPlanConfig>) -> Self {
        Self { booking, plans }
    }

    /// Returns the booking settings.
    pub fn booking(&self) -> &BookingConfig {
        &self.booking
    }

    /// Returns all salary plans.
    pub fn plans(&self) -> &HashMap<String, SalaryPlanConfig> {
        &self.plans
    }
}
