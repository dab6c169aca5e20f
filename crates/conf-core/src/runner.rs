//! Top-level run driver
//!
//! Walks a desired-state document in order and reconciles every spec
//! variant, isolating failures per entity: one bad entry is recorded in the
//! [`RunReport`] and the run moves on. Whether any recorded error is fatal
//! to the overall process is the driver's call, not the core's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conf_model::DesiredStateDocument;

use crate::adapter::StoreAdapter;
use crate::mode::ApplyMode;
use crate::reconciler::{EntityReconciler, ReconcileOutcome};
use crate::reporter::ReportLevel;

/// Aggregated result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Spec variants processed (including failed ones)
    pub processed: usize,
    /// Entities persisted
    pub saved: usize,
    /// No-ops: unchanged entities plus create-only skips
    pub skipped: usize,
    /// Entities whose reconciliation failed
    pub errored: usize,
    /// One message per failed entity, in document order
    pub errors: Vec<String>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    fn begin() -> Self {
        let now = Utc::now();
        Self {
            processed: 0,
            saved: 0,
            skipped: 0,
            errored: 0,
            errors: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Whether every entity reconciled cleanly
    pub fn is_clean(&self) -> bool {
        self.errored == 0
    }
}

/// Drives an [`EntityReconciler`] over a whole document
pub struct ReconciliationRunner<A: StoreAdapter> {
    reconciler: EntityReconciler<A>,
}

impl<A: StoreAdapter> ReconciliationRunner<A> {
    /// Create a runner over a configured reconciler
    pub fn new(reconciler: EntityReconciler<A>) -> Self {
        Self { reconciler }
    }

    /// The underlying reconciler
    pub fn reconciler(&self) -> &EntityReconciler<A> {
        &self.reconciler
    }

    /// Mutable access to the underlying reconciler
    pub fn reconciler_mut(&mut self) -> &mut EntityReconciler<A> {
        &mut self.reconciler
    }

    /// Consume the runner, returning the reconciler
    pub fn into_reconciler(self) -> EntityReconciler<A> {
        self.reconciler
    }

    /// Reconcile every entry of the document under one mode
    ///
    /// Entries run in document order; variants under one identifier run
    /// strictly in sequence because they may address the same entity.
    /// Errors never abort the run.
    pub fn run(&mut self, document: &DesiredStateDocument, mode: ApplyMode) -> RunReport {
        let mut report = RunReport::begin();

        for entry in document.entries() {
            for spec in entry.specs() {
                report.processed += 1;
                match self.reconciler.reconcile(entry.identifier(), spec, mode) {
                    Ok(ReconcileOutcome::Saved) => report.saved += 1,
                    Ok(ReconcileOutcome::Unchanged | ReconcileOutcome::SkippedExisting) => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        report.errored += 1;
                        let message = format!("{}: {}", entry.identifier(), e);
                        self.reconciler
                            .reporter()
                            .record(ReportLevel::Error, &message, 0);
                        report.errors.push(message);
                    }
                }
            }
        }

        report.finished_at = Utc::now();
        report
    }
}
