use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One executed request, kept purely for diagnostics.
pub struct HistoryEntry {
    pub method: Method,
    pub uri: String,
    /// HTTP status of the response, or `None` when the transport failed.
    pub status: Option<u16>,
}

#[derive(Debug)]
/// Bounded FIFO of recent requests.
///
/// Appends are thread-safe so a single client instance can be shared across
/// tasks; once the capacity is reached the oldest entry is evicted.
pub struct RequestHistory {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl RequestHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn record(&self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().expect("history lock poisoned");
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .expect("history lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("history lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
