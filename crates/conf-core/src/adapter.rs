//! Collaborator traits the engine consumes
//!
//! The core never talks to a concrete backend. Everything host-specific —
//! entity persistence, scope lookup, content inclusion, version-record
//! storage — enters through the traits in this module, injected via
//! constructors. No ambient lookup.

use conf_model::AttrValue;

use crate::error::Result;
use crate::scope::{ScopeId, ScopeTarget};

/// A persisted entity, opaque except for the capabilities the diff needs
///
/// The engine holds a record only for the duration of one reconciliation
/// call; ownership stays with the store adapter.
pub trait EntityRecord {
    /// The stable logical identifier this record was created under
    fn identifier(&self) -> &str;

    /// The backend's storage id, if the record has been persisted
    fn storage_id(&self) -> Option<u64>;

    /// Current value of an attribute, if set
    fn get(&self, attribute: &str) -> Option<&AttrValue>;

    /// Set an attribute value
    fn set(&mut self, attribute: &str, value: AttrValue);

    /// Replace the record's scope-assignment list
    fn set_scope_ids(&mut self, scope_ids: Vec<ScopeId>);
}

/// Backend access for one entity kind (blocks, pages, widgets, ...)
pub trait StoreAdapter {
    /// The backend's record type
    type Entity: EntityRecord;

    /// All persisted entities matching the identifier
    ///
    /// With a scope target, only entities assigned to that target are
    /// returned (used to disambiguate between scope variants).
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend lookup fails.
    fn find(&self, identifier: &str, scope: Option<&ScopeTarget>) -> Result<Vec<Self::Entity>>;

    /// A fresh, unpersisted record seeded with the identifier
    fn create(&self, identifier: &str) -> Self::Entity;

    /// Persist a record
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails; the caller records it
    /// against the current entity and moves on.
    fn save(&mut self, entity: Self::Entity) -> Result<()>;
}

/// Resolves a scope code to a concrete target
pub trait ScopeDirectory {
    /// Resolve one code
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownScope`] naming the code when it does
    /// not exist.
    fn resolve(&self, code: &str) -> Result<ScopeTarget>;
}

/// Turns an external content reference into a final string value
///
/// Invoked for the reserved `source` key, after the apply-mode gate, so a
/// skipped entity never triggers content inclusion.
pub trait ContentResolver {
    /// Resolve a reference (file path, template name, ...) to its content
    ///
    /// # Errors
    ///
    /// Returns an error when the reference cannot be resolved; this aborts
    /// only the current entity.
    fn resolve(&self, reference: &str) -> Result<String>;
}

/// Key/value persistence behind the version store
///
/// The layout is two columns: `version_key` (unique string) and
/// `version_value` (string-encoded integer, implicitly `"0"` when absent).
/// Failures here must never abort a run; the version store swallows them.
pub trait VersionBacking {
    /// Stored value for a key, if present
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Create or update a record
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing cannot be written.
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}
