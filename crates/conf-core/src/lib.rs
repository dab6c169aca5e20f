//! Reconciliation engine for declarative configuration
//!
//! Given a desired-state document ([`conf_model::DesiredStateDocument`])
//! and an apply mode, the engine brings a target system's persisted state
//! into alignment without redundant writes:
//!
//! - **[`EntityReconciler`]**: the generic lookup → gate → diff → save
//!   algorithm, parameterized by a [`StoreAdapter`] and a
//!   [`ComponentProfile`]
//! - **[`ApplyMode`]**: maintain vs. create-only (version stamps override
//!   create-only via the [`VersionStore`])
//! - **[`ScopeResolver`]**: global → grouped-unit → leaf-unit override
//!   targets
//! - **[`ReconciliationRunner`]**: document-order driver with per-entity
//!   error isolation, producing a [`RunReport`]
//! - **[`DiffReporter`]**: leveled, nested narration of every decision
//!
//! # Architecture
//!
//! ```text
//!                 external driver (document, mode)
//!                               |
//!                    ReconciliationRunner
//!                               |
//!                       EntityReconciler
//!              /        |            |         \
//!     ScopeResolver  VersionStore  ApplyMode  DiffReporter
//!           |            |
//!    ScopeDirectory  VersionBacking        StoreAdapter
//!        (trait)        (trait)              (trait)
//! ```
//!
//! All collaborators are constructor-injected; the core never implements
//! persistence, content inclusion, or scope lookup itself.

pub mod adapter;
pub mod content;
pub mod error;
pub mod mode;
pub mod reconciler;
pub mod reporter;
pub mod runner;
pub mod scope;
pub mod version;

pub use adapter::{ContentResolver, EntityRecord, ScopeDirectory, StoreAdapter, VersionBacking};
pub use content::FileContentResolver;
pub use error::{Error, Result};
pub use mode::ApplyMode;
pub use reconciler::{ComponentProfile, EntityReconciler, ReconcileOutcome};
pub use reporter::{DiffReporter, NullReporter, ReportLevel, TracingReporter};
pub use runner::{ReconciliationRunner, RunReport};
pub use scope::{ScopeId, ScopeLevel, ScopeResolver, ScopeTarget};
pub use version::{FileVersionBacking, KEY_PREFIX, VersionStore, version_key};
