//! Payroll window and proration calculations.
//!
//! Payroll runs from the 26th of the prior month to the 25th of the selected
//! month. Employees who join or leave inside a window are paid in proportion to
//! the calendar days they were active.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollWindow;

/// Parses a date string as a UTC instant.
///
/// Full instants (anything containing `T`) are parsed as RFC 3339, falling back
/// to a zone-less timestamp read as UTC. Bare `YYYY-MM-DD` dates are anchored at
/// `00:00:00Z`, never local time. Empty, missing or unparseable values give
/// `None`.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::parse_date_as_utc;
///
/// let instant = parse_date_as_utc(Some("2025-03-01")).unwrap();
/// assert_eq!(instant.to_rfc3339(), "2025-03-01T00:00:00+00:00");
/// assert!(parse_date_as_utc(None).is_none());
/// ```
pub fn parse_date_as_utc(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = if value.contains('T') {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    };

    if parsed.is_none() {
        debug!(value, "Unparseable date treated as absent");
    }
    parsed
}

/// Computes the payroll window for a `"YYYY-MM"` month selector.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMonth`] if the selector is not a `YYYY-MM`
/// token with a month in `1..=12`.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::get_payroll_window;
///
/// let window = get_payroll_window("2025-01").unwrap();
/// assert_eq!(window.window_start_date, "2024-12-26");
/// assert_eq!(window.window_end_date, "2025-01-25");
/// ```
pub fn get_payroll_window(selected_month: &str) -> EngineResult<PayrollWindow> {
    let invalid = |message: &str| EngineError::InvalidMonth {
        value: selected_month.to_string(),
        message: message.to_string(),
    };

    let (year, month) = selected_month
        .trim()
        .split_once('-')
        .ok_or_else(|| invalid("expected YYYY-MM"))?;
    let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
    let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;

    if !(1..=12).contains(&month) {
        return Err(invalid("month must be between 1 and 12"));
    }

    PayrollWindow::for_year_month(year, month).ok_or_else(|| invalid("year out of range"))
}

/// Fraction of a payroll window during which an employee was active.
///
/// The employment interval is clamped to the window; open ends (`None`) mean
/// the employee was active from before / until after the window. Both day
/// counts are inclusive calendar-day differences and the window length is
/// floored at one day. The result is clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::{get_active_workday_ratio, get_payroll_window};
/// use rust_decimal::Decimal;
///
/// let window = get_payroll_window("2025-03").unwrap();
/// let ratio = get_active_workday_ratio(None, None, window.window_start, window.window_end);
/// assert_eq!(ratio, Decimal::ONE);
/// ```
pub fn get_active_workday_ratio(
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Decimal {
    let effective_start = start_date.map_or(window_start, |start| start.max(window_start));
    let effective_end = end_date.map_or(window_end, |end| end.min(window_end));

    if effective_end < effective_start {
        return Decimal::ZERO;
    }

    let days_active = calendar_days_inclusive(effective_start, effective_end);
    let total_days = calendar_days_inclusive(window_start, window_end).max(1);

    let ratio = Decimal::from(days_active) / Decimal::from(total_days);
    ratio.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Convenience wrapper over [`get_active_workday_ratio`] taking the raw
/// nullable `start_date` / `end_date` strings of an employee record.
pub fn active_workday_ratio_for(
    start_date: Option<&str>,
    end_date: Option<&str>,
    window: &PayrollWindow,
) -> Decimal {
    get_active_workday_ratio(
        parse_date_as_utc(start_date),
        parse_date_as_utc(end_date),
        window.window_start,
        window.window_end,
    )
}

fn calendar_days_inclusive(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.date_naive() - from.date_naive()).num_days() + 1
}
