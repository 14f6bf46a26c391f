//! Background release of expired step locks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::session::BookingSession;

/// A repeating task that releases a session's lock once it has expired.
///
/// The task is aborted when the sweeper is stopped or dropped, so it never
/// outlives the wizard that owns it.
#[derive(Debug)]
pub struct LockSweeper {
    handle: JoinHandle<()>,
}

impl LockSweeper {
    /// Spawns the sweep loop on the current tokio runtime.
    pub fn spawn(session: Arc<Mutex<BookingSession>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if session.lock().await.sweep_expired_lock() {
                    debug!("Sweeper released an expired step lock");
                }
            }
        });
        Self { handle }
    }

    /// Spawns a sweeper using the session's configured sweep interval.
    pub async fn for_session(session: Arc<Mutex<BookingSession>>) -> Self {
        let period = session.lock().await.config().sweep_interval();
        Self::spawn(session, period)
    }

    /// Returns true while the sweep loop is running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the sweep loop.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for LockSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::clock::ManualClock;
    use crate::booking::notify::TracingNotifier;
    use crate::booking::store::MemoryStore;
    use crate::config::BookingConfig;
    use crate::models::{BookingStep, LockState};
    use chrono::{TimeZone, Utc};

    fn session(clock: Arc<ManualClock>) -> Arc<Mutex<BookingSession>> {
        Arc::new(Mutex::new(BookingSession::restore(
            BookingConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(TracingNotifier),
            clock,
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_releases_expired_lock() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
        ));
        let session = session(clock.clone());
        session.lock().await.initiate_step_change(
            BookingStep::Services,
            BookingStep::Datetime,
            "next-button",
        );

        let sweeper = LockSweeper::for_session(session.clone()).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(session.lock().await.state().lock.is_locked());

        clock.advance(chrono::Duration::seconds(5));
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(session.lock().await.state().lock, LockState::Idle);

        sweeper.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_sweeper_aborts_task() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let sweeper = LockSweeper::spawn(session(clock), Duration::from_millis(1000));
        assert!(sweeper.is_running());
        drop(sweeper);
    }
}
