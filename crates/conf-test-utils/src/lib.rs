//! Shared test collaborators for the reconciler workspace
//!
//! In-memory implementations of every trait `conf-core` consumes, with the
//! failure-injection hooks the fail-open and error-isolation tests need.
//! Used by unit tests across the crates and by `tests/integration`.

pub mod reporter;
pub mod scopes;
pub mod store;
pub mod versions;

pub use reporter::{RecordingReporter, ReportEvent};
pub use scopes::MemoryScopeDirectory;
pub use store::{MemoryEntity, MemoryStore};
pub use versions::MemoryVersionBacking;
