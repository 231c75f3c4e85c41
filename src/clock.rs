//! The session clock.

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tracing::debug;

/// A one-shot clock bounding a session's arrivals.
///
/// Started at session creation; after the nominal duration it transitions
/// from running to stopped exactly once, irreversibly, and broadcasts the
/// stop timestamp. The timestamp is retained, so an observer that checks
/// after the fact still sees the transition; it cannot be missed.
#[derive(Debug)]
pub struct SessionClock {
    rx: watch::Receiver<Option<Instant>>,
    handle: JoinHandle<()>,
}

impl SessionClock {
    /// Start the clock. It fires once, `nominal` from now.
    pub fn start(nominal: Duration) -> Self {
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(nominal).await;
            debug!("session clock stopped after {:?}", nominal);

            // Observers may already be gone if the session was torn down.
            let _ = tx.send(Some(Instant::now()));
        });

        Self { rx, handle }
    }

    /// A new observer of this clock.
    pub fn observer(&self) -> ClockObserver {
        ClockObserver {
            rx: self.rx.clone(),
        }
    }

    /// Wait for the timer task itself to finish.
    pub(crate) async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }
}

/// A handle for watching a [`SessionClock`] without polling races.
#[derive(Debug, Clone)]
pub struct ClockObserver {
    rx: watch::Receiver<Option<Instant>>,
}

impl ClockObserver {
    /// Has the clock stopped yet?
    pub fn is_stopped(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// The stop timestamp, if the clock has stopped.
    pub fn stopped_at(&self) -> Option<Instant> {
        *self.rx.borrow()
    }

    /// Wait until the clock stops and return the stop timestamp.
    ///
    /// Resolves immediately if it has already stopped.
    pub async fn stopped(&mut self) -> Instant {
        let state: Option<Instant> = *self
            .rx
            .wait_for(|state| state.is_some())
            .await
            .expect("clock task dropped before stopping");

        state.expect("stopped state always carries a timestamp")
    }
}
