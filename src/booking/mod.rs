//! The booking wizard step machine.
//!
//! The wizard moves through `services → datetime → barber → details → summary`.
//! Step changes are serialized by a short-lived lock so that two UI triggers
//! firing together cannot both move the wizard. [`reduce`] holds the pure
//! transition rules; [`BookingSession`] applies them and performs the resulting
//! effects against a [`BookingStore`] and a [`Notifier`]; [`LockSweeper`]
//! releases abandoned locks in the background.

mod clock;
mod notify;
mod reducer;
mod session;
mod store;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier, TracingNotifier};
pub use reducer::{BookingAction, Effect, Transition, reduce};
pub use session::BookingSession;
pub use store::{BookingStore, FileStore, MemoryStore};
pub use sweeper::LockSweeper;
