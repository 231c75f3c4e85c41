//! Sorting and searching the merged ledger.

use std::collections::{BTreeMap, BTreeSet};

use crate::ledger::{GlobalLedger, VisitRecord};

/// Which column to order a report by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// Lexicographic by student name.
    Name,
    /// Grouped by topic id; a student appears under every topic they asked
    /// about.
    Topic,
}

/// Report ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Sorted and searchable views over a [`GlobalLedger`].
///
/// Indexes are built once up front: the name list sorted ascending (the
/// binary-search target) and a topic-to-students mapping.
pub struct ReportEngine<'a> {
    ledger: &'a GlobalLedger,
    names: Vec<&'a str>,
    by_topic: BTreeMap<u64, BTreeSet<&'a str>>,
}

impl<'a> ReportEngine<'a> {
    /// Build the report indexes for a ledger.
    pub fn new(ledger: &'a GlobalLedger) -> Self {
        // Ledger iteration is already name-ascending.
        let names: Vec<&str> = ledger.iter().map(|(name, _)| name).collect();

        let mut by_topic: BTreeMap<u64, BTreeSet<&str>> = BTreeMap::new();
        for (name, record) in ledger.iter() {
            for &topic in record.topics() {
                by_topic.entry(topic).or_default().insert(name);
            }
        }

        Self {
            ledger,
            names,
            by_topic,
        }
    }

    /// The sequence of student names under the requested ordering.
    ///
    /// Under [`SortColumn::Topic`] a student with several topics appears
    /// once per topic, in topic-id order.
    pub fn sort(&self, column: SortColumn, direction: SortDirection) -> Vec<&'a str> {
        match column {
            SortColumn::Name => {
                let mut names = self.names.clone();
                if direction == SortDirection::Descending {
                    names.reverse();
                }
                names
            }
            SortColumn::Topic => self
                .topic_groups(direction)
                .into_iter()
                .flat_map(|(_, students)| students.iter().copied())
                .collect(),
        }
    }

    /// The per-topic student sets, in the requested topic-id direction.
    ///
    /// Only topics somebody actually asked about appear.
    pub fn topic_groups(&self, direction: SortDirection) -> Vec<(u64, &BTreeSet<&'a str>)> {
        match direction {
            SortDirection::Ascending => self
                .by_topic
                .iter()
                .map(|(topic, students)| (*topic, students))
                .collect(),
            SortDirection::Descending => self
                .by_topic
                .iter()
                .rev()
                .map(|(topic, students)| (*topic, students))
                .collect(),
        }
    }

    /// Exact-match lookup by name, via binary search on the sorted name
    /// list.
    ///
    /// A miss is an ordinary outcome, not an error.
    pub fn search_by_name(&self, name: &str) -> Option<&'a VisitRecord> {
        self.names
            .binary_search_by(|probe| (*probe).cmp(name))
            .ok()
            .and_then(|index| self.ledger.get(self.names[index]))
    }

    /// The set of students who asked about a topic, or `None` if nobody
    /// did.
    pub fn search_by_topic(&self, topic: u64) -> Option<&BTreeSet<&'a str>> {
        self.by_topic.get(&topic)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn ledger(entries: &[(&str, &[u64])]) -> GlobalLedger {
        let visits: BTreeMap<String, VisitRecord> = entries
            .iter()
            .map(|(name, topics)| {
                (
                    name.to_string(),
                    VisitRecord {
                        count: topics.len() as u64,
                        topics: topics.iter().copied().collect(),
                    },
                )
            })
            .collect();

        let mut ledger = GlobalLedger::default();
        ledger.merge_session(&visits);
        ledger
    }

    #[test]
    fn name_sorts_reverse_each_other() {
        let ledger = ledger(&[
            ("Student12", &[1]),
            ("Student56", &[2]),
            ("Student90", &[3]),
        ]);
        let engine = ReportEngine::new(&ledger);

        let ascending = engine.sort(SortColumn::Name, SortDirection::Ascending);
        let mut descending = engine.sort(SortColumn::Name, SortDirection::Descending);

        assert_eq!(ascending, vec!["Student12", "Student56", "Student90"]);
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn topic_sort_lists_students_under_every_topic_they_asked() {
        let ledger = ledger(&[("Student12", &[2, 5]), ("Student56", &[2])]);
        let engine = ReportEngine::new(&ledger);

        assert_eq!(
            engine.sort(SortColumn::Topic, SortDirection::Ascending),
            vec!["Student12", "Student56", "Student12"]
        );
        assert_eq!(
            engine.sort(SortColumn::Topic, SortDirection::Descending),
            vec!["Student12", "Student12", "Student56"]
        );
    }

    #[test]
    fn topic_groups_follow_the_requested_direction() {
        let ledger = ledger(&[("Student12", &[2, 5]), ("Student56", &[9])]);
        let engine = ReportEngine::new(&ledger);

        let topics: Vec<u64> = engine
            .topic_groups(SortDirection::Descending)
            .into_iter()
            .map(|(topic, _)| topic)
            .collect();
        assert_eq!(topics, vec![9, 5, 2]);
    }

    #[test]
    fn search_by_name_agrees_with_a_linear_scan() {
        let ledger = ledger(&[
            ("Student12", &[1]),
            ("Student40", &[2, 3]),
            ("Student90", &[4]),
        ]);
        let engine = ReportEngine::new(&ledger);

        for (name, record) in ledger.iter() {
            assert_eq!(engine.search_by_name(name), Some(record));
        }
        assert_eq!(engine.search_by_name("Student41"), None);
    }

    #[test]
    fn search_works_on_empty_and_single_entry_ledgers() {
        let empty = GlobalLedger::default();
        assert_eq!(ReportEngine::new(&empty).search_by_name("Student40"), None);

        let single = ledger(&[("Student40", &[7])]);
        let engine = ReportEngine::new(&single);
        assert_eq!(engine.search_by_name("Student40").unwrap().count(), 1);
        assert_eq!(engine.search_by_name("Student39"), None);
    }

    #[test]
    fn search_by_topic_returns_the_exact_student_set() {
        let ledger = ledger(&[("Student12", &[2, 5]), ("Student56", &[2])]);
        let engine = ReportEngine::new(&ledger);

        let students: Vec<&str> = engine
            .search_by_topic(2)
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(students, vec!["Student12", "Student56"]);

        assert_eq!(engine.search_by_topic(13), None);
    }
}
