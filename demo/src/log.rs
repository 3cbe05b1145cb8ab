use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Local};
use tracing::debug;

/// One timestamped line in the demo log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{} {}", self.at.format("%H:%M:%S%.3f"), self.message) }
}

/// Append-only bounded log shared between the components and the app driver.
///
/// A line identical to the one right before it is dropped; older lines fall off once
/// `capacity` is reached.
#[derive(Clone)]
pub struct LogSink(Arc<Inner>);

struct Inner {
    capacity: usize,
    display: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogSink {
    /// At least one line is retained, and never more are shown than retained.
    pub fn new(capacity: usize, display: usize) -> Self {
        let (capacity, display) = bounds(capacity, display);
        Self(Arc::new(Inner { capacity, display, entries: Mutex::new(VecDeque::with_capacity(capacity)) }))
    }

    pub fn capacity(&self) -> usize { self.0.capacity }

    /// Number of lines [`LogSink::recent`] returns at most
    pub fn display(&self) -> usize { self.0.display }

    pub fn push(&self, message: impl Into<String>) -> bool { self.push_at(Local::now(), message) }

    /// Append a line with an explicit timestamp. Returns false when it repeated the last line.
    pub fn push_at(&self, at: DateTime<Local>, message: impl Into<String>) -> bool {
        let message = message.into();
        let mut entries = self.entries();
        if entries.back().is_some_and(|last| last.message == message) {
            return false;
        }
        debug!("log: {message}");
        entries.push_back(LogEntry { at, message });
        while entries.len() > self.0.capacity {
            entries.pop_front();
        }
        true
    }

    /// The most recent lines, oldest first, limited to the display count
    pub fn recent(&self) -> Vec<LogEntry> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(self.0.display);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> { self.entries().iter().map(|e| e.message.clone()).collect() }

    pub fn len(&self) -> usize { self.entries().len() }

    pub fn is_empty(&self) -> bool { self.entries().is_empty() }

    pub fn clear(&self) { self.entries().clear() }

    fn entries(&self) -> std::sync::MutexGuard<'_, VecDeque<LogEntry>> { self.0.entries.lock().unwrap_or_else(PoisonError::into_inner) }
}

/// Clamp a capacity/display pair the way [`LogSink::new`] does
pub(crate) fn bounds(capacity: usize, display: usize) -> (usize, usize) {
    let capacity = capacity.max(1);
    (capacity, display.min(capacity))
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").field("entries", &self.len()).field("capacity", &self.0.capacity).finish()
    }
}
