//! Booking wizard models.
//!
//! This module defines the wizard steps, the lock and transaction records that
//! guard step changes, the full [`BookingState`], and the [`PersistedBooking`]
//! subset that survives a reload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A step of the booking wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    /// Choosing services.
    #[default]
    Services,
    /// Choosing a date and time slot.
    Datetime,
    /// Choosing a barber.
    Barber,
    /// Entering customer details.
    Details,
    /// Reviewing the booking.
    Summary,
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStep::Services => write!(f, "services"),
            BookingStep::Datetime => write!(f, "datetime"),
            BookingStep::Barber => write!(f, "barber"),
            BookingStep::Details => write!(f, "details"),
            BookingStep::Summary => write!(f, "summary"),
        }
    }
}

/// A time-boxed mutual-exclusion token guarding step changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockTransaction {
    /// The transaction that owns the lock.
    pub id: Uuid,
    /// The UI component that requested it.
    pub component_id: String,
    /// When the lock was granted.
    pub timestamp: DateTime<Utc>,
    /// When the lock stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl LockTransaction {
    /// A lock is expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// The lock slot of the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LockState {
    /// No lock has been granted, or it was released.
    #[default]
    Idle,
    /// A lock has been granted. It may have expired without being released.
    Locked(LockTransaction),
}

impl LockState {
    /// Returns the lock if it is still valid at `now`.
    pub fn valid_at(&self, now: DateTime<Utc>) -> Option<&LockTransaction> {
        match self {
            LockState::Idle => None,
            LockState::Locked(lock) if lock.is_expired(now) => None,
            LockState::Locked(lock) => Some(lock),
        }
    }

    /// Returns true if the slot holds a lock owned by `transaction_id`.
    pub fn is_held_by(&self, transaction_id: Uuid) -> bool {
        matches!(self, LockState::Locked(lock) if lock.id == transaction_id)
    }

    /// Returns true when a lock is present (valid or not).
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked(_))
    }
}

/// Lifecycle of a step transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Lock granted, step not yet changed.
    Pending,
    /// Step changed.
    Completed,
    /// Explicitly failed by the caller.
    Failed,
}

/// A request to move the wizard from one step to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTransaction {
    /// Transaction identifier (shared with its lock).
    pub id: Uuid,
    /// Step the request was made from.
    pub from: BookingStep,
    /// Requested target step.
    pub to: BookingStep,
    /// Current status.
    pub status: TransactionStatus,
    /// When the status last changed.
    pub timestamp: DateTime<Utc>,
    /// Failure reason, for failed transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A service picked in the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedService {
    /// Service identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// List price.
    pub price: Decimal,
    /// Duration in minutes.
    #[serde(default)]
    pub duration_minutes: u32,
}

/// Contact details captured in the details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    /// Customer name.
    #[serde(default)]
    pub name: String,
    /// Customer phone number.
    #[serde(default)]
    pub phone: String,
    /// Optional email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional notes for the barber.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The full wizard state.
///
/// Only the fields mirrored in [`PersistedBooking`] are written to storage; the
/// lock and transaction bookkeeping always starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingState {
    /// The step currently shown.
    pub current_step: BookingStep,
    /// Services in the basket.
    pub selected_services: Vec<SelectedService>,
    /// Appointment date.
    pub selected_date: Option<DateTime<Utc>>,
    /// Appointment time slot, e.g. `"14:30"`.
    pub selected_time: Option<String>,
    /// Chosen barber identifier.
    pub selected_barber: Option<String>,
    /// Customer contact details.
    pub customer_details: CustomerDetails,
    /// Branch the booking is for.
    pub branch: Option<String>,
    /// The lock slot.
    pub lock: LockState,
    /// Transactions granted the lock but not yet finished.
    pub pending_transactions: Vec<StepTransaction>,
    /// Finished transactions, oldest first.
    pub transaction_history: Vec<StepTransaction>,
}

impl BookingState {
    /// Returns true if `id` is among the pending transactions.
    pub fn is_pending(&self, id: Uuid) -> bool {
        self.pending_transactions.iter().any(|t| t.id == id)
    }

    /// Checks whether the data required by `step` has been captured.
    ///
    /// The summary step has no requirements of its own.
    pub fn is_step_complete(&self, step: BookingStep) -> bool {
        match step {
            BookingStep::Services => !self.selected_services.is_empty(),
            BookingStep::Datetime => self.selected_date.is_some(),
            BookingStep::Barber => self.selected_barber.is_some(),
            BookingStep::Details => {
                !self.customer_details.name.trim().is_empty()
                    && !self.customer_details.phone.trim().is_empty()
            }
            BookingStep::Summary => true,
        }
    }

    /// Extracts the persistable subset.
    pub fn snapshot(&self) -> PersistedBooking {
        PersistedBooking {
            current_step: self.current_step,
            selected_services: self.selected_services.clone(),
            selected_date: self.selected_date,
            selected_time: self.selected_time.clone(),
            selected_barber: self.selected_barber.clone(),
            customer_details: self.customer_details.clone(),
            branch: self.branch.clone(),
        }
    }

    /// Rebuilds a state from a persisted snapshot with empty lock bookkeeping.
    pub fn rehydrate(persisted: PersistedBooking) -> Self {
        Self {
            current_step: persisted.current_step,
            selected_services: persisted.selected_services,
            selected_date: persisted.selected_date,
            selected_time: persisted.selected_time,
            selected_barber: persisted.selected_barber,
            customer_details: persisted.customer_details,
            branch: persisted.branch,
            ..Self::default()
        }
    }
}

/// The non-transactional part of [`BookingState`], as stored between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedBooking {
    /// The step currently shown.
    pub current_step: BookingStep,
    /// Services in the basket.
    pub selected_services: Vec<SelectedService>,
    /// Appointment date, stored as an ISO string.
    pub selected_date: Option<DateTime<Utc>>,
    /// Appointment time slot.
    pub selected_time: Option<String>,
    /// Chosen barber identifier.
    pub selected_barber: Option<String>,
    /// Customer contact details.
    pub customer_details: CustomerDetails,
    /// Branch the booking is for.
    pub branch: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_state() -> BookingState {
        BookingState {
            current_step: BookingStep::Barber,
            selected_services: vec![SelectedService {
                id: "svc_fade".to_string(),
                name: "Skin fade".to_string(),
                price: Decimal::from(60),
                duration_minutes: 45,
            }],
            selected_date: Some(Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap()),
            selected_time: Some("14:30".to_string()),
            branch: Some("riyadh-olaya".to_string()),
            ..BookingState::default()
        }
    }

    #[test]
    fn test_lock_validity_respects_expiry() {
        let granted = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let lock = LockTransaction {
            id: Uuid::new_v4(),
            component_id: "services-panel".to_string(),
            timestamp: granted,
            expires_at: granted + Duration::seconds(5),
        };
        let state = LockState::Locked(lock.clone());

        assert!(state.valid_at(granted + Duration::seconds(4)).is_some());
        assert!(state.valid_at(granted + Duration::seconds(5)).is_none());
        assert!(state.is_held_by(lock.id));
        assert!(!LockState::Idle.is_held_by(lock.id));
    }

    #[test]
    fn test_step_completeness() {
        let mut state = sample_state();
        assert!(state.is_step_complete(BookingStep::Services));
        assert!(state.is_step_complete(BookingStep::Datetime));
        assert!(!state.is_step_complete(BookingStep::Barber));
        assert!(!state.is_step_complete(BookingStep::Details));
        assert!(state.is_step_complete(BookingStep::Summary));

        state.customer_details.name = "Omar".to_string();
        assert!(!state.is_step_complete(BookingStep::Details));
        state.customer_details.phone = "+966500000000".to_string();
        assert!(state.is_step_complete(BookingStep::Details));
    }

    #[test]
    fn test_snapshot_excludes_lock_bookkeeping() {
        let mut state = sample_state();
        let now = Utc::now();
        state.lock = LockState::Locked(LockTransaction {
            id: Uuid::new_v4(),
            component_id: "x".to_string(),
            timestamp: now,
            expires_at: now + Duration::seconds(5),
        });

        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert!(json.get("lock").is_none());
        assert!(json.get("pendingTransactions").is_none());
        assert_eq!(json["currentStep"], "barber");
        assert_eq!(json["selectedDate"], "2025-03-14T00:00:00Z");
    }

    #[test]
    fn test_rehydrate_resets_transactional_fields() {
        let state = sample_state();
        let restored = BookingState::rehydrate(state.snapshot());
        assert_eq!(restored, state);
        assert_eq!(restored.lock, LockState::Idle);
        assert!(restored.transaction_history.is_empty());
    }

    #[test]
    fn test_persisted_booking_tolerates_missing_fields() {
        let persisted: PersistedBooking =
            serde_json::from_str(r#"{ "currentStep": "details" }"#).unwrap();
        assert_eq!(persisted.current_step, BookingStep::Details);
        assert!(persisted.selected_services.is_empty());
    }
}
