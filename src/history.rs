//! history.rs: session-only log of completed analyses, newest first.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::model::AnalysisResult;

/// Default number of analyses kept per session.
pub const DEFAULT_HISTORY_CAP: usize = 10;
const MAX_HISTORY_CAP: usize = 10_000;

/// Bounded, most-recent-first log.
///
/// Only the analysis controller appends; everything else reads. Nothing is
/// deduplicated: re-analyzing the same text adds a new entry with its own timestamp.
#[derive(Debug)]
pub struct HistoryStore {
    inner: Mutex<VecDeque<AnalysisResult>>,
    cap: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAP)
    }
}

impl HistoryStore {
    /// `cap` is clamped to `1..=10_000`.
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_HISTORY_CAP);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    /// Insert at the front; drop the oldest entry once over capacity.
    pub fn append(&self, result: AnalysisResult) {
        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push_front(result);
        while v.len() > self.cap {
            if let Some(evicted) = v.pop_back() {
                tracing::debug!(ts = %evicted.timestamp, "history: evicted oldest entry");
            }
        }
    }

    /// Snapshot, newest first.
    pub fn all(&self) -> Vec<AnalysisResult> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.iter().cloned().collect()
    }

    /// Entry at `index` (0 = newest) for replay. Read-only.
    pub fn select(&self, index: usize) -> Option<AnalysisResult> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn clear(&self) {
        self.inner.lock().expect("history mutex poisoned").clear();
    }
}
