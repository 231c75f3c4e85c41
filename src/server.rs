//! The server.

use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::{clock::ClockObserver, queue::WaitingRoom, session::SessionResult};

/// Serves students from the waiting room one at a time, recording wait and
/// service times in service order.
pub(crate) struct Server {
    room: Arc<WaitingRoom>,
    clock: ClockObserver,
}

impl Server {
    pub(crate) fn new(room: Arc<WaitingRoom>, clock: ClockObserver) -> Self {
        Self { room, clock }
    }

    /// Serve until the room is closed and drained, then finalize.
    ///
    /// Students already queued when the clock stops are still served; the
    /// time from the clock's stop to the end of the last service is the
    /// session's overtime, floored at zero.
    pub(crate) async fn run(mut self) -> SessionResult {
        let mut result = SessionResult::default();
        let mut last_service_end: Option<Instant> = None;

        while let Some(student) = self.room.pop().await {
            let wait = student.arrived_at().elapsed();
            result.wait_times.push(wait);

            // The sleep is the simulated engagement time.
            sleep(student.service_duration()).await;

            last_service_end = Some(Instant::now());
            result.service_times.push(student.service_duration());
            result.record_visit(student.name(), student.topic());

            debug!(
                "served {} (topic {}) after {:?} waiting",
                student.name(),
                student.topic(),
                wait
            );
        }

        // pop() only turns terminal once the room is closed, and the room
        // only closes after the clock has stopped.
        let stopped_at = self.clock.stopped().await;
        result.overtime = last_service_end
            .map(|end| end.saturating_duration_since(stopped_at))
            .unwrap_or_default();

        result
    }
}
