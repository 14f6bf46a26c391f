//! The booking wizard state transition function.
//!
//! [`reduce`] is the single chokepoint for all wizard state changes. It is pure:
//! it returns the next state together with the effects (persist, notify) the
//! caller must carry out, and never touches storage or the UI itself.
//!
//! # Locking
//!
//! Step changes are guarded by a time-boxed lock. While a valid lock exists,
//! every action other than lock acquisition and release is dropped, except a
//! `SetStep` for a transaction that is still pending.
//! Acquisition never queues: it succeeds if the slot is empty or expired and is
//! a no-op otherwise.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{
    BookingState, BookingStep, CustomerDetails, LockState, LockTransaction, PersistedBooking,
    SelectedService, StepTransaction, TransactionStatus,
};

use super::notify::Notification;

/// An action dispatched to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    /// Requests the step lock for a `from -> to` transition.
    AcquireLock {
        /// The requesting UI component.
        component_id: String,
        /// Fresh transaction identifier.
        transaction_id: Uuid,
        /// Step the request is made from.
        from: BookingStep,
        /// Requested target step.
        to: BookingStep,
    },
    /// Releases the lock if `transaction_id` owns it.
    ReleaseLock {
        /// The owning transaction.
        transaction_id: Uuid,
    },
    /// Moves the wizard to `step`.
    SetStep {
        /// Target step.
        step: BookingStep,
        /// Transaction the change belongs to.
        transaction_id: Uuid,
    },
    /// Marks a pending transaction as failed.
    FailTransaction {
        /// The failing transaction.
        transaction_id: Uuid,
        /// Reason shown to the user.
        error: String,
    },
    /// Replaces the selected services.
    SetServices(Vec<SelectedService>),
    /// Sets or clears the appointment date.
    SetDate(Option<DateTime<Utc>>),
    /// Sets or clears the time slot.
    SetTime(Option<String>),
    /// Sets or clears the barber.
    SetBarber(Option<String>),
    /// Replaces the customer details.
    SetCustomerDetails(CustomerDetails),
    /// Sets or clears the branch.
    SetBranch(Option<String>),
    /// Restores the initial empty state.
    Reset,
}

impl BookingAction {
    /// A short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            BookingAction::AcquireLock { .. } => "acquire_lock",
            BookingAction::ReleaseLock { .. } => "release_lock",
            BookingAction::SetStep { .. } => "set_step",
            BookingAction::FailTransaction { .. } => "fail_transaction",
            BookingAction::SetServices(_) => "set_services",
            BookingAction::SetDate(_) => "set_date",
            BookingAction::SetTime(_) => "set_time",
            BookingAction::SetBarber(_) => "set_barber",
            BookingAction::SetCustomerDetails(_) => "set_customer_details",
            BookingAction::SetBranch(_) => "set_branch",
            BookingAction::Reset => "reset",
        }
    }

    fn is_lock_operation(&self) -> bool {
        matches!(
            self,
            BookingAction::AcquireLock { .. } | BookingAction::ReleaseLock { .. }
        )
    }

    /// The transaction of a step change, the only action that may pass a
    /// held lock.
    fn step_transaction(&self) -> Option<Uuid> {
        match self {
            BookingAction::SetStep { transaction_id, .. } => Some(*transaction_id),
            _ => None,
        }
    }
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write the persistable subset to durable storage.
    Persist(PersistedBooking),
    /// Show a notification.
    Notify(Notification),
}

/// Output of [`reduce`].
#[derive(Debug, Clone)]
pub struct Transition {
    /// The next state (a copy of the input when the action was dropped).
    pub state: BookingState,
    /// Effects to carry out, in order.
    pub effects: Vec<Effect>,
    /// Whether the action changed anything.
    pub applied: bool,
}

impl Transition {
    fn dropped(state: &BookingState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            applied: false,
        }
    }

    fn lock_change(state: BookingState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            applied: true,
        }
    }
}

/// Computes the next wizard state for `action` at instant `now`.
///
/// `lock_ttl` is the lifetime given to newly granted locks.
///
/// # Examples
///
/// ```
/// use barbershop_engine::booking::{BookingAction, reduce};
/// use barbershop_engine::models::{BookingState, BookingStep};
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// let now = Utc::now();
/// let tx = Uuid::new_v4();
/// let state = BookingState::default();
///
/// let locked = reduce(&state, BookingAction::AcquireLock {
///     component_id: "services-panel".to_string(),
///     transaction_id: tx,
///     from: BookingStep::Services,
///     to: BookingStep::Datetime,
/// }, now, Duration::seconds(5));
/// assert!(locked.applied);
///
/// let moved = reduce(&locked.state, BookingAction::SetStep {
///     step: BookingStep::Datetime,
///     transaction_id: tx,
/// }, now, Duration::seconds(5));
/// assert_eq!(moved.state.current_step, BookingStep::Datetime);
/// ```
pub fn reduce(
    state: &BookingState,
    action: BookingAction,
    now: DateTime<Utc>,
    lock_ttl: Duration,
) -> Transition {
    match action {
        BookingAction::AcquireLock {
            component_id,
            transaction_id,
            from,
            to,
        } => {
            if state.lock.valid_at(now).is_some() {
                return Transition::dropped(state);
            }
            let mut next = state.clone();
            next.lock = LockState::Locked(LockTransaction {
                id: transaction_id,
                component_id,
                timestamp: now,
                expires_at: now
                    .checked_add_signed(lock_ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            });
            next.pending_transactions.push(StepTransaction {
                id: transaction_id,
                from,
                to,
                status: TransactionStatus::Pending,
                timestamp: now,
                error: None,
            });
            Transition::lock_change(next)
        }

        BookingAction::ReleaseLock { transaction_id } => {
            if !state.lock.is_held_by(transaction_id) {
                return Transition::dropped(state);
            }
            let mut next = state.clone();
            next.lock = LockState::Idle;
            Transition::lock_change(next)
        }

        action => {
            debug_assert!(!action.is_lock_operation());
            if state.lock.valid_at(now).is_some() {
                let continues_pending = action
                    .step_transaction()
                    .is_some_and(|id| state.is_pending(id));
                if !continues_pending {
                    return Transition::dropped(state);
                }
            }
            match apply(state, action, now) {
                Some((next, mut effects)) => {
                    effects.push(Effect::Persist(next.snapshot()));
                    if let Some(warning) = validate(&next) {
                        effects.push(Effect::Notify(warning));
                    }
                    Transition {
                        state: next,
                        effects,
                        applied: true,
                    }
                }
                None => Transition::dropped(state),
            }
        }
    }
}

/// Applies a non-lock action. Returns `None` if the action has nothing to act on.
fn apply(
    state: &BookingState,
    action: BookingAction,
    now: DateTime<Utc>,
) -> Option<(BookingState, Vec<Effect>)> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        BookingAction::SetStep {
            step,
            transaction_id,
        } => {
            next.current_step = step;
            if let Some(mut tx) = take_pending(&mut next, transaction_id) {
                tx.to = step;
                tx.status = TransactionStatus::Completed;
                tx.timestamp = now;
                next.transaction_history.push(tx);
            }
        }
        BookingAction::FailTransaction {
            transaction_id,
            error,
        } => {
            let mut tx = take_pending(&mut next, transaction_id)?;
            tx.status = TransactionStatus::Failed;
            tx.timestamp = now;
            tx.error = Some(error.clone());
            next.transaction_history.push(tx);
            effects.push(Effect::Notify(Notification::error(error, transaction_id)));
        }
        BookingAction::SetServices(services) => next.selected_services = services,
        BookingAction::SetDate(date) => next.selected_date = date,
        BookingAction::SetTime(time) => next.selected_time = time,
        BookingAction::SetBarber(barber) => next.selected_barber = barber,
        BookingAction::SetCustomerDetails(details) => next.customer_details = details,
        BookingAction::SetBranch(branch) => next.branch = branch,
        BookingAction::Reset => next = BookingState::default(),
        BookingAction::AcquireLock { .. } | BookingAction::ReleaseLock { .. } => return None,
    }

    Some((next, effects))
}

fn take_pending(state: &mut BookingState, id: Uuid) -> Option<StepTransaction> {
    let index = state.pending_transactions.iter().position(|t| t.id == id)?;
    Some(state.pending_transactions.remove(index))
}

/// Advisory completeness check for the current step, once a branch is chosen.
fn validate(state: &BookingState) -> Option<Notification> {
    state.branch.as_ref()?;
    if state.is_step_complete(state.current_step) {
        return None;
    }
    let message = match state.current_step {
        BookingStep::Services => "Please select at least one service",
        BookingStep::Datetime => "Please select a date",
        BookingStep::Barber => "Please select a barber",
        BookingStep::Details => "Please enter your name and phone number",
        BookingStep::Summary => return None,
    };
    Some(Notification::warning(message))
}
