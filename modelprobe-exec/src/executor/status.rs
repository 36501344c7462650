//! Shared view of in-flight tasks.
//!
//! The board lock is only taken for short, synchronous reads and writes and
//! is never held across an `.await`. Readers copy the entries out and work
//! on the copy.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use modelprobe_core::TaskStatus;

/// In-flight task statuses keyed by submission slot.
#[derive(Debug, Default)]
pub struct StatusBoard {
    entries: Mutex<BTreeMap<usize, TaskStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, TaskStatus>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self, slot: usize, target_id: &str) {
        self.lock().insert(slot, TaskStatus::starting(target_id));
    }

    /// Applies `f` to the entry of `slot`, if it is still on the board.
    pub fn update(&self, slot: usize, f: impl FnOnce(&mut TaskStatus)) {
        if let Some(status) = self.lock().get_mut(&slot) {
            f(status);
        }
    }

    pub fn remove(&self, slot: usize) {
        self.lock().remove(&slot);
    }

    pub fn snapshot(&self) -> Vec<(usize, TaskStatus)> {
        self.lock()
            .iter()
            .map(|(slot, status)| (*slot, status.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Completion counter, independent of the board lock.
#[derive(Debug)]
pub struct RunProgress {
    completed: AtomicUsize,
    total: usize,
}

impl RunProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Records one terminated task and returns the new count.
    pub fn complete_one(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
