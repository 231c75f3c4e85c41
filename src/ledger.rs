//! Visit ledgers.

use std::collections::{BTreeMap, BTreeSet};

/// A per-student record: how many visits, and the set of topics asked
/// about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitRecord {
    pub(crate) count: u64,
    pub(crate) topics: BTreeSet<u64>,
}

impl VisitRecord {
    /// Number of recorded visits.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Topics asked about, in ascending id order.
    pub fn topics(&self) -> &BTreeSet<u64> {
        &self.topics
    }

    pub(crate) fn record(&mut self, topic: u64) {
        self.count += 1;
        self.topics.insert(topic);
    }

    pub(crate) fn absorb(&mut self, other: &VisitRecord) {
        self.count += other.count;
        self.topics.extend(other.topics.iter().copied());
    }
}

/// The merged visit history across every session in a run.
///
/// Built in a single-threaded merge step after all sessions have joined.
/// Keyed by name: duplicate names across sessions (or across different
/// ids that happen to share a name) fold into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalLedger {
    entries: BTreeMap<String, VisitRecord>,
}

impl GlobalLedger {
    /// Look up a student by exact name.
    pub fn get(&self, name: &str) -> Option<&VisitRecord> {
        self.entries.get(name)
    }

    /// Iterate entries in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VisitRecord)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Number of distinct student names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Has anybody visited at all?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn merge_session(&mut self, visits: &BTreeMap<String, VisitRecord>) {
        for (name, record) in visits {
            self.entries
                .entry(name.clone())
                .or_default()
                .absorb(record);
        }
    }
}
