//! Configuration loading and management for the barbershop engine.
//!
//! This module loads the booking wizard settings and the salary plan catalog
//! from a configuration directory of YAML and JSON files.
//!
//! # Example
//!
//! ```no_run
//! use barbershop_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/barbershop").unwrap();
//! println!("Lock TTL: {}ms", config.booking().lock_ttl_ms);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BookingConfig, DEFAULT_LOCK_TTL_MS, DEFAULT_STORAGE_KEY, DEFAULT_SWEEP_INTERVAL_MS,
    EngineConfig, MAX_LOCK_TTL_MS, MAX_SWEEP_INTERVAL_MS,
};
