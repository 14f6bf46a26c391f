//! Payroll window model.
//!
//! This module contains the [`PayrollWindow`] type, the 26th-to-25th accounting
//! period used for monthly salary computation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The payroll accounting window for a selected month.
///
/// The window opens on the 26th of the prior month at 00:00:00 UTC and closes
/// on the 25th of the selected month at 23:59:59.999 UTC.
///
/// # Example
///
/// ```
/// use barbershop_engine::models::PayrollWindow;
///
/// let window = PayrollWindow::for_year_month(2025, 3).unwrap();
/// assert_eq!(window.window_start_date, "2025-02-26");
/// assert_eq!(window.window_end_date, "2025-03-25");
/// assert_eq!(window.total_days(), 28);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollWindow {
    /// Start of the window (prior month's 26th, UTC midnight).
    pub window_start: DateTime<Utc>,
    /// End of the window (selected month's 25th, last millisecond of the day).
    pub window_end: DateTime<Utc>,
    /// `yyyy-MM-dd` projection of `window_start`.
    pub window_start_date: String,
    /// `yyyy-MM-dd` projection of `window_end`.
    pub window_end_date: String,
}

impl PayrollWindow {
    /// Builds the window for a 1-indexed `(year, month)` pair.
    ///
    /// Returns `None` when `month` is outside `1..=12` or the year is out of
    /// chrono's range.
    pub fn for_year_month(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }

        let (prior_year, prior_month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };

        let start = NaiveDate::from_ymd_opt(prior_year, prior_month, 26)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let end = NaiveDate::from_ymd_opt(year, month, 25)?
            .and_hms_milli_opt(23, 59, 59, 999)?
            .and_utc();

        Some(Self::from_instants(start, end))
    }

    /// Wraps two instants, deriving the ISO date projections.
    pub fn from_instants(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            window_start,
            window_end,
            window_start_date: window_start.format("%Y-%m-%d").to_string(),
            window_end_date: window_end.format("%Y-%m-%d").to_string(),
        }
    }

    /// Inclusive number of calendar days covered by the window.
    pub fn total_days(&self) -> i64 {
        (self.window_end.date_naive() - self.window_start.date_naive()).num_days() + 1
    }

    /// Checks whether an instant falls inside the window (inclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.window_start && instant <= self.window_end
    }
}
