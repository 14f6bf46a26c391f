//! The booking session: owns the wizard state and carries out effects.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::calculation::{PackagePrice, calculate_package_price};
use crate::config::BookingConfig;
use crate::error::EngineError;
use crate::models::{
    BookingState, BookingStep, CustomerDetails, LockState, PersistedBooking, SelectedService,
};

use super::clock::Clock;
use super::notify::Notifier;
use super::reducer::{BookingAction, Effect, reduce};
use super::store::BookingStore;

/// One customer's pass through the booking wizard.
///
/// The session is an explicitly constructed container: it is created with its
/// store, notifier and clock, rehydrated from storage, and torn down with
/// [`BookingSession::teardown`]. Every mutation goes through [`reduce`].
pub struct BookingSession {
    state: BookingState,
    config: BookingConfig,
    store: Box<dyn BookingStore>,
    notifier: Box<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BookingSession {
    /// Creates a session, rehydrating any state persisted under the configured
    /// storage key.
    ///
    /// Lock and transaction bookkeeping always starts empty. An unreadable or
    /// corrupt blob is logged and ignored.
    pub fn restore(
        config: BookingConfig,
        store: Box<dyn BookingStore>,
        notifier: Box<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = match store.load(&config.storage_key) {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedBooking>(&blob) {
                Ok(persisted) => {
                    debug!(key = %config.storage_key, "Rehydrated booking state");
                    BookingState::rehydrate(persisted)
                }
                Err(e) => {
                    warn!(key = %config.storage_key, error = %e, "Discarding corrupt booking state");
                    BookingState::default()
                }
            },
            Ok(None) => BookingState::default(),
            Err(e) => {
                warn!(key = %config.storage_key, error = %e, "Failed to load booking state");
                BookingState::default()
            }
        };

        Self {
            state,
            config,
            store,
            notifier,
            clock,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// Returns the session settings.
    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Dispatches an action and carries out its effects.
    ///
    /// Returns `false` when the action was dropped.
    pub fn dispatch(&mut self, action: BookingAction) -> bool {
        let name = action.name();
        let transition = reduce(&self.state, action, self.clock.now(), self.config.lock_ttl());

        if !transition.applied {
            debug!(action = name, "Booking action dropped");
            return false;
        }

        self.state = transition.state;
        for effect in transition.effects {
            self.perform(effect);
        }
        true
    }

    fn perform(&self, effect: Effect) {
        match effect {
            Effect::Persist(snapshot) => self.persist(&snapshot),
            Effect::Notify(notification) => self.notifier.notify(notification),
        }
    }

    fn persist(&self, snapshot: &PersistedBooking) {
        let key = &self.config.storage_key;
        let result = serde_json::to_string(snapshot)
            .map_err(EngineError::from)
            .and_then(|blob| self.store.save(key, &blob));
        if let Err(e) = result {
            error!(key = %key, error = %e, "Failed to persist booking state");
        }
    }

    /// Requests a step change from `from` to `to` on behalf of `component_id`.
    ///
    /// Acquires the step lock and, if it was granted, moves to `to`. Returns
    /// `false` without changing anything when another transaction holds a
    /// valid lock. The lock is not released afterwards; it lapses after the
    /// configured TTL or on an explicit release.
    pub fn initiate_step_change(
        &mut self,
        from: BookingStep,
        to: BookingStep,
        component_id: &str,
    ) -> bool {
        let transaction_id = Uuid::new_v4();
        self.dispatch(BookingAction::AcquireLock {
            component_id: component_id.to_string(),
            transaction_id,
            from,
            to,
        });

        if !self.state.lock.is_held_by(transaction_id) {
            info!(
                component = component_id,
                from = %from,
                to = %to,
                "Step change rejected, lock is held"
            );
            return false;
        }

        debug!(transaction_id = %transaction_id, from = %from, to = %to, "Step lock acquired");
        self.dispatch(BookingAction::SetStep {
            step: to,
            transaction_id,
        })
    }

    /// Releases the lock if `transaction_id` owns it.
    pub fn release_lock(&mut self, transaction_id: Uuid) -> bool {
        self.dispatch(BookingAction::ReleaseLock { transaction_id })
    }

    /// Marks a pending transaction as failed and notifies the user.
    ///
    /// Dropped while any valid lock is held, including the transaction's own.
    pub fn fail_transaction(&mut self, transaction_id: Uuid, error: impl Into<String>) -> bool {
        self.dispatch(BookingAction::FailTransaction {
            transaction_id,
            error: error.into(),
        })
    }

    /// Releases the held lock if it has expired. Returns whether it did.
    pub fn sweep_expired_lock(&mut self) -> bool {
        let expired = match &self.state.lock {
            LockState::Locked(lock) if lock.is_expired(self.clock.now()) => lock.id,
            _ => return false,
        };
        debug!(transaction_id = %expired, "Releasing expired step lock");
        self.release_lock(expired)
    }

    /// Releases any lock, valid or not. Called when the wizard goes away.
    pub fn teardown(&mut self) {
        if let LockState::Locked(lock) = &self.state.lock {
            let id = lock.id;
            self.release_lock(id);
        }
    }

    /// Replaces the selected services.
    pub fn set_services(&mut self, services: Vec<SelectedService>) -> bool {
        self.dispatch(BookingAction::SetServices(services))
    }

    /// Sets the appointment date.
    pub fn set_date(&mut self, date: Option<chrono::DateTime<chrono::Utc>>) -> bool {
        self.dispatch(BookingAction::SetDate(date))
    }

    /// Sets the time slot.
    pub fn set_time(&mut self, time: Option<String>) -> bool {
        self.dispatch(BookingAction::SetTime(time))
    }

    /// Sets the barber.
    pub fn set_barber(&mut self, barber: Option<String>) -> bool {
        self.dispatch(BookingAction::SetBarber(barber))
    }

    /// Replaces the customer details.
    pub fn set_customer_details(&mut self, details: CustomerDetails) -> bool {
        self.dispatch(BookingAction::SetCustomerDetails(details))
    }

    /// Sets the branch.
    pub fn set_branch(&mut self, branch: Option<String>) -> bool {
        self.dispatch(BookingAction::SetBranch(branch))
    }

    /// Restores the initial empty state.
    pub fn reset(&mut self) -> bool {
        self.dispatch(BookingAction::Reset)
    }

    /// Prices the selected services with the configured bundle discounts.
    pub fn basket_price(&self) -> PackagePrice {
        let prices: Vec<_> = self.state.selected_services.iter().map(|s| s.price).collect();
        calculate_package_price(&prices, &self.config.package_discounts)
    }
}
