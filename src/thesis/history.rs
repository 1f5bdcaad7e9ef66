//! Bounded most-recent-first thesis history

use super::ThesisSnapshot;
use std::collections::VecDeque;

/// Default number of snapshots retained
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Append-only history that evicts the oldest snapshot past its limit
#[derive(Debug, Clone)]
pub struct ThesisHistory {
    entries: VecDeque<ThesisSnapshot>,
    limit: usize,
}

impl ThesisHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Insert at the front, dropping the oldest entry when full
    pub fn push(&mut self, snapshot: ThesisSnapshot) {
        self.entries.push_front(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_back();
        }
    }

    /// Snapshots, newest first
    pub fn list(&self) -> Vec<ThesisSnapshot> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&ThesisSnapshot> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ThesisHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
