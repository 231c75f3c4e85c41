//! A single office-hours session.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::{
    arrival::ArrivalGenerator,
    clock::SessionClock,
    config::SessionConfig,
    error::SimResult,
    ledger::VisitRecord,
    queue::WaitingRoom,
    rng::RandomSource,
    server::Server,
};

/// One complete office-hours run, from clock start to queue drained.
///
/// Three tasks share the waiting room: the clock's timer, the arrival
/// generator, and the server. [`Session::run`] joins all three before
/// returning, so a finished session has nothing left in flight.
pub struct Session {
    config: SessionConfig,
}

impl Session {
    /// Create a session with the given parameters.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run the session to completion.
    ///
    /// The clock stopping only gates new arrivals: whoever is queued at
    /// that point is still served, and the spill past the nominal end is
    /// reported as the session's overtime.
    pub async fn run<R>(self, rng: R) -> SimResult<SessionResult>
    where
        R: RandomSource + 'static,
    {
        let room = Arc::new(WaitingRoom::new(self.config.discipline));
        let clock = SessionClock::start(self.config.nominal_duration);

        let generator =
            ArrivalGenerator::new(self.config.clone(), Arc::clone(&room), clock.observer(), rng);
        let server = Server::new(Arc::clone(&room), clock.observer());

        let generator_handle = tokio::spawn(generator.run());
        let server_handle = tokio::spawn(server.run());

        clock.join().await?;
        let generated = generator_handle.await??;
        let result = server_handle.await?;

        debug_assert_eq!(
            generated,
            result.served(),
            "every arrival is served exactly once"
        );
        debug!(
            "session complete: {} served, overtime {:?}",
            result.served(),
            result.overtime()
        );

        Ok(result)
    }
}

/// Per-session aggregates.
///
/// One wait and one service entry per served student, in service order,
/// plus the visit ledger and any overtime. A session that served nobody is
/// still a valid, detectably empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResult {
    pub(crate) wait_times: Vec<Duration>,
    pub(crate) service_times: Vec<Duration>,
    pub(crate) overtime: Duration,
    pub(crate) visits: BTreeMap<String, VisitRecord>,
}

impl SessionResult {
    /// How many students were served.
    pub fn served(&self) -> usize {
        self.wait_times.len()
    }

    /// Time each student waited, in service order.
    pub fn wait_times(&self) -> &[Duration] {
        &self.wait_times
    }

    /// Time each student was engaged for, in service order.
    pub fn service_times(&self) -> &[Duration] {
        &self.service_times
    }

    /// Service time spent past the session's nominal end.
    pub fn overtime(&self) -> Duration {
        self.overtime
    }

    /// Visits recorded this session, keyed by student name.
    pub fn visits(&self) -> &BTreeMap<String, VisitRecord> {
        &self.visits
    }

    /// Mean wait, or `None` if the session served nobody.
    pub fn mean_wait(&self) -> Option<Duration> {
        mean_of(&self.wait_times)
    }

    /// Mean service time, or `None` if the session served nobody.
    pub fn mean_service(&self) -> Option<Duration> {
        mean_of(&self.service_times)
    }

    pub(crate) fn record_visit(&mut self, name: &str, topic: u64) {
        self.visits.entry(name.to_string()).or_default().record(topic);
    }
}

/// Mean of a duration sequence; `None` when it is empty, so an empty
/// session contributes no ratio instead of a division fault.
pub(crate) fn mean_of(durations: &[Duration]) -> Option<Duration> {
    if durations.is_empty() {
        return None;
    }

    let total: Duration = durations.iter().copied().sum();
    Some(total / durations.len() as u32)
}
