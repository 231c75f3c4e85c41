//! The arrival generator.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::debug;

use crate::{
    clock::ClockObserver,
    config::SessionConfig,
    error::SimResult,
    queue::WaitingRoom,
    rng::RandomSource,
    student::Student,
};

/// Feeds the waiting room with randomly spaced arrivals until the session
/// clock stops.
pub(crate) struct ArrivalGenerator<R> {
    config: SessionConfig,
    room: Arc<WaitingRoom>,
    clock: ClockObserver,
    rng: R,
}

impl<R: RandomSource> ArrivalGenerator<R> {
    pub(crate) fn new(
        config: SessionConfig,
        room: Arc<WaitingRoom>,
        clock: ClockObserver,
        rng: R,
    ) -> Self {
        Self {
            config,
            room,
            clock,
            rng,
        }
    }

    /// Run until the clock stops, then close the room.
    ///
    /// The clock is checked before every push: no arrival is generated
    /// after the stop is observed, but an arrival whose interval wait has
    /// already elapsed when the stop fires is still enqueued exactly once.
    /// The room is closed on every exit path, so the server's drain always
    /// terminates.
    pub(crate) async fn run(mut self) -> SimResult<usize> {
        let generated = self.generate().await;
        self.room.close();
        generated
    }

    async fn generate(&mut self) -> SimResult<usize> {
        let mut generated = 0;

        loop {
            let interval = self.rng.next(
                *self.config.arrival_interval.start(),
                *self.config.arrival_interval.end(),
            )?;

            tokio::select! {
                _ = self.clock.stopped() => break,
                _ = sleep(self.config.scale(interval)) => {}
            }

            if self.clock.is_stopped() {
                break;
            }

            let student = Student::draw(&self.config, &mut self.rng)?;
            debug!(
                "{} arrived (priority {}, topic {})",
                student.name(),
                student.priority(),
                student.topic()
            );
            self.room.push(student);
            generated += 1;
        }

        debug!("arrivals closed after {} students", generated);
        Ok(generated)
    }
}
