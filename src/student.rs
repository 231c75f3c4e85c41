//! Students.

use std::time::Duration;

use tokio::time::Instant;

use crate::{config::SessionConfig, error::SimResult, rng::RandomSource};

/// A student waiting to be seen.
///
/// Immutable once created: every field, including the service duration, is
/// drawn at arrival time and never recomputed.
#[derive(Debug, Clone)]
pub struct Student {
    id: u64,
    name: String,
    priority: u64,
    topic: u64,
    service_duration: Duration,
    arrived_at: Instant,
}

impl Student {
    /// Draw a new student from the session's random source.
    ///
    /// Fields are drawn in a fixed order (priority, topic, id, service
    /// duration) so that seeded runs replay.
    pub(crate) fn draw(
        config: &SessionConfig,
        rng: &mut impl RandomSource,
    ) -> SimResult<Self> {
        let priority = rng.next(*config.priority.start(), *config.priority.end())?;
        let topic = rng.next(*config.topic_ids.start(), *config.topic_ids.end())?;
        let id = rng.next(*config.student_ids.start(), *config.student_ids.end())?;
        let service_units =
            rng.next(*config.service_duration.start(), *config.service_duration.end())?;

        Ok(Self::new(id, priority, topic, config.scale(service_units)))
    }

    pub(crate) fn new(id: u64, priority: u64, topic: u64, service_duration: Duration) -> Self {
        Self {
            id,
            name: format!("Student{id}"),
            priority,
            topic,
            service_duration,
            arrived_at: Instant::now(),
        }
    }

    /// The drawn id. Not unique: two students may share an id and a name.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The name derived from the id.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The drawn priority. Higher is served first under
    /// [`Discipline::Priority`](crate::Discipline::Priority).
    pub fn priority(&self) -> u64 {
        self.priority
    }

    /// The topic this student wants to ask about.
    pub fn topic(&self) -> u64 {
        self.topic
    }

    /// How long this student's question takes.
    pub fn service_duration(&self) -> Duration {
        self.service_duration
    }

    /// When this student joined the waiting room.
    pub fn arrived_at(&self) -> Instant {
        self.arrived_at
    }
}

#[cfg(test)]
mod tests {
    use crate::rng::ScriptSource;

    use super::*;

    #[test]
    fn draw_respects_the_configured_spaces_and_order() {
        let config = SessionConfig::default();
        let mut rng = ScriptSource::new([700, 13, 40, 12, 0]);

        let student = Student::draw(&config, &mut rng).unwrap();

        assert_eq!(student.priority(), 700);
        assert_eq!(student.topic(), 13);
        assert_eq!(student.id(), 40);
        assert_eq!(student.name(), "Student40");
        assert_eq!(student.service_duration(), Duration::from_secs(12));
    }

    #[test]
    fn students_sharing_an_id_share_a_name() {
        let a = Student::new(56, 1, 2, Duration::from_secs(1));
        let b = Student::new(56, 9, 4, Duration::from_secs(3));

        assert_eq!(a.name(), b.name());
    }
}
