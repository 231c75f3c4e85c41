//! The shared waiting room.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::{config::Discipline, student::Student};

/// The queue of students waiting to be seen, shared between the arrival
/// generator and the server.
///
/// All mutation happens under a single lock, so checking for emptiness and
/// removing the head are one atomic step: an element handed to one caller
/// can never be observed by another. [`WaitingRoom::pop`] parks until a
/// student is available, and resolves to `None` once the room has been
/// [closed](WaitingRoom::close) and drained.
pub struct WaitingRoom {
    inner: Mutex<Inner>,
    notify: Notify,
}

struct Inner {
    backlog: Backlog,
    /// Arrival sequence, the tie-break under the priority discipline.
    next_seq: u64,
    closed: bool,
}

enum Backlog {
    Fifo(VecDeque<Student>),
    Priority(BinaryHeap<Ranked>),
}

impl WaitingRoom {
    /// Create an empty room with the given discipline.
    pub fn new(discipline: Discipline) -> Self {
        let backlog = match discipline {
            Discipline::Fifo => Backlog::Fifo(VecDeque::new()),
            Discipline::Priority => Backlog::Priority(BinaryHeap::new()),
        };

        Self {
            inner: Mutex::new(Inner {
                backlog,
                next_seq: 0,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Add a student to the room and wake the server if it is parked.
    pub fn push(&self, student: Student) {
        {
            let mut inner = self.lock();
            debug_assert!(!inner.closed, "no arrivals after the room is closed");

            let seq = inner.next_seq;
            inner.next_seq += 1;

            match &mut inner.backlog {
                Backlog::Fifo(queue) => queue.push_back(student),
                Backlog::Priority(heap) => heap.push(Ranked { student, seq }),
            }
        }

        self.notify.notify_one();
    }

    /// Take the head student per the discipline.
    ///
    /// Parks while the room is empty but still open. Returns `None` once
    /// the room is closed and drained.
    pub async fn pop(&self) -> Option<Student> {
        loop {
            let notified = self.notify.notified();
            {
                let mut inner = self.lock();
                if let Some(student) = inner.take_next() {
                    return Some(student);
                }
                if inner.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Close the room: no further pushes, and [`WaitingRoom::pop`] becomes
    /// terminal once the backlog drains.
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_one();
    }

    /// Number of students currently waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Is anybody waiting?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("waiting room lock poisoned")
    }
}

impl Inner {
    fn take_next(&mut self) -> Option<Student> {
        match &mut self.backlog {
            Backlog::Fifo(queue) => queue.pop_front(),
            Backlog::Priority(heap) => heap.pop().map(|ranked| ranked.student),
        }
    }

    fn len(&self) -> usize {
        match &self.backlog {
            Backlog::Fifo(queue) => queue.len(),
            Backlog::Priority(heap) => heap.len(),
        }
    }
}

/// A student ranked for the priority discipline: highest priority first,
/// ties broken by earliest arrival.
struct Ranked {
    student: Student,
    seq: u64,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.student
            .priority()
            .cmp(&other.student.priority())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}
