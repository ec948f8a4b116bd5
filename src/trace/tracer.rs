//! Exploration history and the trace window
//!
//! History is newest-first and only ever grows. A trace window is a counter
//! layered on top: it counts how many entries were recorded since the last
//! [`Tracer::start_trace`], so extracting it is a prefix of the history.

use super::HistoryEntry;
use crate::models::EntryKind;

#[derive(Debug, Default, Clone)]
pub struct Tracer {
    history: Vec<HistoryEntry>,
    tracing: bool,
    window_count: usize,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful lookup. Counts towards the window while tracing.
    pub fn record_selection(&mut self, kind: EntryKind, key: impl Into<String>) {
        self.history.insert(0, HistoryEntry::new(kind, key));
        if self.tracing {
            self.window_count += 1;
        }
    }

    /// Open a new trace window; existing history is untouched
    pub fn start_trace(&mut self) {
        self.tracing = true;
        self.window_count = 0;
    }

    /// Close the window and return its entries, newest first
    ///
    /// The count is left as is, so a repeated call without a new
    /// `start_trace` returns the same window again. Without any
    /// `start_trace` the window is empty.
    pub fn stop_trace_and_extract(&mut self) -> Vec<HistoryEntry> {
        let end = self.window_count.min(self.history.len());
        let window = self.history[..end].to_vec();
        self.tracing = false;
        window
    }

    /// Full history, newest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_tracing(&self) -> bool {
        self.tracing
    }

    pub fn window_count(&self) -> usize {
        self.window_count
    }
}
