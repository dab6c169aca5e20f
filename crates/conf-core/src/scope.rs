//! Scope hierarchy and resolution
//!
//! Configuration applies at one of three levels: global, a grouped unit
//! (e.g. a website), or a leaf unit (e.g. a store). A spec names its scope
//! path as an ordered list of codes; resolution turns codes into concrete
//! [`ScopeTarget`]s via the injected [`ScopeDirectory`].
//!
//! Lookup and write use the path differently: when an existing entity must
//! be found among several scope variants, the *first* code alone is
//! authoritative for the lookup filter; all named codes become the write
//! target list once the entity is found or created.

use serde::{Deserialize, Serialize};

use crate::adapter::ScopeDirectory;
use crate::error::Result;

/// Numeric id of a concrete scope target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

impl ScopeId {
    /// The broadest scope; entities with no scope path are assigned here
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// Level of a scope target in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    /// Applies everywhere
    Global,
    /// A grouped unit (website-like)
    Group,
    /// A leaf unit (store-like)
    Leaf,
}

impl ScopeLevel {
    /// Indent level for reporting: global=0, grouped=1, leaf=2
    pub fn nest_depth(self) -> usize {
        match self {
            ScopeLevel::Global => 0,
            ScopeLevel::Group => 1,
            ScopeLevel::Leaf => 2,
        }
    }
}

/// A resolved, concrete scope target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTarget {
    /// Backend id of the target
    pub id: ScopeId,
    /// The code the target was resolved from
    pub code: String,
    /// Hierarchy level
    pub level: ScopeLevel,
}

impl ScopeTarget {
    /// The implicit global target
    pub fn global() -> Self {
        Self {
            id: ScopeId::GLOBAL,
            code: "global".to_string(),
            level: ScopeLevel::Global,
        }
    }
}

/// Resolves scope paths against a [`ScopeDirectory`]
pub struct ScopeResolver {
    directory: Box<dyn ScopeDirectory>,
}

impl ScopeResolver {
    /// Create a resolver over a directory
    pub fn new(directory: Box<dyn ScopeDirectory>) -> Self {
        Self { directory }
    }

    /// The single target used to look up an existing entity
    ///
    /// An empty path yields the global target. Otherwise the first code is
    /// resolved; the rest of the path is deliberately ignored here because
    /// the backend needs one physical target to test for an existing
    /// record. The full path still drives the write list via
    /// [`Self::resolve_all`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownScope`] when the first code does not
    /// resolve.
    pub fn lookup_target(&self, codes: &[String]) -> Result<ScopeTarget> {
        match codes.first() {
            None => Ok(ScopeTarget::global()),
            Some(code) => self.directory.resolve(code),
        }
    }

    /// Every code resolved, order preserved — the write target list
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownScope`] on the first code that does
    /// not resolve; the caller aborts the current entity.
    pub fn resolve_all(&self, codes: &[String]) -> Result<Vec<ScopeTarget>> {
        codes.iter().map(|code| self.directory.resolve(code)).collect()
    }
}
