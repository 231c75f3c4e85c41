//! Run and session configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use bon::bon;

/// The ordering rule for the waiting room, fixed for a session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discipline {
    /// Serve in arrival order.
    #[default]
    Fifo,
    /// Serve by descending priority; ties go to the earliest arrival.
    Priority,
}

/// Parameters for a single session.
///
/// Interval and duration bounds are drawn as whole numbers of time units
/// and scaled by `time_unit` (one second by default).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub(crate) nominal_duration: Duration,
    pub(crate) arrival_interval: RangeInclusive<u64>,
    pub(crate) service_duration: RangeInclusive<u64>,
    pub(crate) priority: RangeInclusive<u64>,
    pub(crate) student_ids: RangeInclusive<u64>,
    pub(crate) topic_ids: RangeInclusive<u64>,
    pub(crate) time_unit: Duration,
    pub(crate) discipline: Discipline,
}

#[bon]
impl SessionConfig {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// How long new arrivals are accepted for.
        #[builder(default = Duration::from_secs(60))]
        nominal_duration: Duration,
        /// Bounds on the wait between consecutive arrivals, in time units.
        #[builder(default = 5..=15)]
        arrival_interval: RangeInclusive<u64>,
        /// Bounds on a single student's service duration, in time units.
        #[builder(default = 10..=20)]
        service_duration: RangeInclusive<u64>,
        /// Bounds on a student's drawn priority.
        #[builder(default = 0..=1000)]
        priority: RangeInclusive<u64>,
        /// The student id space. Names are derived from ids.
        #[builder(default = 10..=99)]
        student_ids: RangeInclusive<u64>,
        /// The topic id space.
        #[builder(default = 0..=30)]
        topic_ids: RangeInclusive<u64>,
        /// What one time unit maps to.
        #[builder(default = Duration::from_secs(1))]
        time_unit: Duration,
        /// Which student the server takes next.
        #[builder(default)]
        discipline: Discipline,
    ) -> Self {
        Self {
            nominal_duration,
            arrival_interval,
            service_duration,
            priority,
            student_ids,
            topic_ids,
            time_unit,
            discipline,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SessionConfig {
    /// Scale a drawn unit count into a duration.
    pub(crate) fn scale(&self, units: u64) -> Duration {
        self.time_unit * units as u32
    }
}

/// Parameters for a whole run: how many sessions, how many at once, and the
/// per-session configuration they share.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub(crate) sessions: usize,
    pub(crate) max_concurrent: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) session: SessionConfig,
}

#[bon]
impl RunConfig {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// How many independent sessions to run.
        #[builder(default = 100)]
        sessions: usize,
        /// Cap on sessions in flight at once. Defaults to available
        /// parallelism.
        max_concurrent: Option<usize>,
        /// Seed for a reproducible run. Unseeded runs draw from OS entropy.
        seed: Option<u64>,
        /// Parameters shared by every session.
        #[builder(default)]
        session: SessionConfig,
    ) -> Self {
        Self {
            sessions,
            max_concurrent,
            seed,
            session,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_the_classic_setup() {
        let config = SessionConfig::default();

        assert_eq!(config.nominal_duration, Duration::from_secs(60));
        assert_eq!(config.arrival_interval, 5..=15);
        assert_eq!(config.service_duration, 10..=20);
        assert_eq!(config.priority, 0..=1000);
        assert_eq!(config.student_ids, 10..=99);
        assert_eq!(config.topic_ids, 0..=30);
        assert_eq!(config.discipline, Discipline::Fifo);
    }

    #[test]
    fn scale_applies_the_time_unit() {
        let config = SessionConfig::builder()
            .time_unit(Duration::from_millis(10))
            .build();

        assert_eq!(config.scale(3), Duration::from_millis(30));
    }

    #[test]
    fn run_defaults() {
        let config = RunConfig::default();

        assert_eq!(config.sessions, 100);
        assert_eq!(config.max_concurrent, None);
        assert_eq!(config.seed, None);
    }
}
