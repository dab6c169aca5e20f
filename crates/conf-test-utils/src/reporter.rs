//! Recording diff reporter
//!
//! Clone-shared like [`crate::versions::MemoryVersionBacking`]: the engine
//! owns one handle, the test inspects the other.

use std::sync::{Arc, Mutex};

use conf_core::{DiffReporter, ReportLevel};

/// One captured event
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    pub level: ReportLevel,
    pub message: String,
    pub nest_depth: usize,
}

/// Reporter that stores every event for later assertions
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    /// A fresh reporter with no events
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, in order
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().expect("reporter poisoned").clone()
    }

    /// Messages captured at one level, in order
    pub fn messages_at(&self, level: ReportLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Whether any event at the level contains the substring
    pub fn contains(&self, level: ReportLevel, needle: &str) -> bool {
        self.messages_at(level).iter().any(|m| m.contains(needle))
    }
}

impl DiffReporter for RecordingReporter {
    fn record(&self, level: ReportLevel, message: &str, nest_depth: usize) {
        self.events
            .lock()
            .expect("reporter poisoned")
            .push(ReportEvent {
                level,
                message: message.to_string(),
                nest_depth,
            });
    }
}
