//! Status reporting.
//!
//! Every phase transition and the death event go through a [`Reporter`].
//! Implementations must serialize concurrent emissions so lines from
//! different philosophers never interleave mid-line.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

/// Sink for timestamped philosopher status lines.
pub trait Reporter: fmt::Debug + Send + Sync {
    /// Record one status line. `timestamp_ms` counts from simulation start.
    fn emit(&self, actor_id: u32, timestamp_ms: u64, message: &str);
}

/// One reported status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub actor_id: u32,
    pub timestamp_ms: u64,
    pub message: String,
}

fn format_line(actor_id: u32, timestamp_ms: u64, message: &str) -> String {
    format!("{timestamp_ms} {actor_id} {message}")
}

/// Reporter that writes one line per event to stdout.
///
/// The stdout handle lock is held for the whole `writeln!`, which keeps
/// lines from concurrent philosophers atomic.
#[derive(Debug, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn emit(&self, actor_id: u32, timestamp_ms: u64, message: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth aborting the run over.
        let _ = writeln!(out, "{}", format_line(actor_id, timestamp_ms, message));
    }
}

/// Reporter that collects events in memory, in emission order.
///
/// Used by the test suites and by embedders that want the raw event log
/// instead of formatted lines.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, actor_id: u32, timestamp_ms: u64, message: &str) {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(Event {
            actor_id,
            timestamp_ms,
            message: message.to_string(),
        });
    }
}
