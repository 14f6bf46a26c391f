//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the booking
//! settings and the salary plan catalog from disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::SalaryPlanConfig;

use super::types::{BookingConfig, EngineConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/barbershop/
/// ├── booking.yaml        # Booking wizard settings (optional)
/// └── plans/
///     ├── default.yaml    # One salary plan per file, YAML or JSON
///     └── fixed.json
/// ```
///
/// # Example
///
/// ```no_run
/// use barbershop_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/barbershop").unwrap();
/// let plan = loader.get_plan("default").unwrap();
/// println!("Plan: {} ({} blocks)", plan.name, plan.blocks.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The `plans` directory is missing or holds no plan files
    /// - Any file contains invalid YAML/JSON
    ///
    /// A missing `booking.yaml` falls back to [`BookingConfig::default`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let booking_path = path.join("booking.yaml");
        let booking = if booking_path.exists() {
            let booking = Self::load_yaml::<BookingConfig>(&booking_path)?;
            booking
                .validate()
                .map_err(|message| EngineError::ConfigParseError {
                    path: booking_path.display().to_string(),
                    message,
                })?;
            booking
        } else {
            debug!(path = %booking_path.display(), "No booking.yaml, using defaults");
            BookingConfig::default()
        };

        let plans = Self::load_plans(&path.join("plans"))?;
        info!(
            path = %path.display(),
            plans = plans.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(booking, plans),
        })
    }

    fn read(path: &Path) -> EngineResult<String> {
        fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let content = Self::read(path)?;
        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads and parses a JSON file.
    fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let content = Self::read(path)?;
        serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads every plan file from the plans directory, keyed by file stem.
    fn load_plans(plans_dir: &Path) -> EngineResult<HashMap<String, SalaryPlanConfig>> {
        let plans_dir_str = plans_dir.display().to_string();

        let entries = fs::read_dir(plans_dir).map_err(|_| EngineError::ConfigNotFound {
            path: plans_dir_str.clone(),
        })?;

        let mut plans = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: plans_dir_str.clone(),
            })?;

            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let plan = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => Self::load_yaml::<SalaryPlanConfig>(&path)?,
                Some("json") => Self::load_json::<SalaryPlanConfig>(&path)?,
                _ => continue,
            };
            plans.insert(stem.to_string(), plan);
        }

        if plans.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no plan files found)", plans_dir_str),
            });
        }

        Ok(plans)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the booking wizard settings.
    pub fn booking(&self) -> &BookingConfig {
        self.config.booking()
    }

    /// Gets a salary plan by name (its file stem).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use barbershop_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/barbershop")?;
    /// let plan = loader.get_plan("dynamic_commission")?;
    /// println!("Plan: {}", plan.description);
    /// # Ok::<(), barbershop_engine::error::EngineError>(())
    /// ```
    pub fn get_plan(&self, name: &str) -> EngineResult<&SalaryPlanConfig> {
        self.config
            .plans()
            .get(name)
            .ok_or_else(|| EngineError::PlanNotFound {
                name: name.to_string(),
            })
    }

    /// Plan names, sorted.
    pub fn plan_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.config.plans().keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
