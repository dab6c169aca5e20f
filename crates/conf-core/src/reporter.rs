//! Structured diff reporting
//!
//! The engine narrates its decisions ("no change", "changed", "saved",
//! errors) through a [`DiffReporter`] sink. Nesting depth is purely
//! presentational and mirrors scope depth (global=0, grouped=1, leaf=2).

use serde::{Deserialize, Serialize};

/// Severity of one reported event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    /// Low-value narration: checks performed, unchanged values
    Comment,
    /// A change was applied or an entity was saved
    Info,
    /// A per-entity failure
    Error,
}

/// Sink for reconciliation events
pub trait DiffReporter {
    /// Record one event at a nesting depth
    fn record(&self, level: ReportLevel, message: &str, nest_depth: usize);
}

/// Default reporter forwarding to `tracing`
///
/// Comments go to debug so a normal run only shows actual changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DiffReporter for TracingReporter {
    fn record(&self, level: ReportLevel, message: &str, nest_depth: usize) {
        let indent = "  ".repeat(nest_depth);
        match level {
            ReportLevel::Comment => tracing::debug!("{}{}", indent, message),
            ReportLevel::Info => tracing::info!("{}{}", indent, message),
            ReportLevel::Error => tracing::error!("{}{}", indent, message),
        }
    }
}

/// Reporter that drops everything (for drivers that only want the report)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl DiffReporter for NullReporter {
    fn record(&self, _level: ReportLevel, _message: &str, _nest_depth: usize) {}
}
