//! In-memory scope directory

use std::collections::HashMap;

use conf_core::{Error, Result, ScopeDirectory, ScopeId, ScopeLevel, ScopeTarget};

/// A fixed code → target directory
#[derive(Debug, Clone, Default)]
pub struct MemoryScopeDirectory {
    targets: HashMap<String, ScopeTarget>,
}

impl MemoryScopeDirectory {
    /// An empty directory (every code is unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf (store-like) target
    pub fn with_leaf(mut self, code: &str, id: u64) -> Self {
        self.targets.insert(
            code.to_string(),
            ScopeTarget {
                id: ScopeId(id),
                code: code.to_string(),
                level: ScopeLevel::Leaf,
            },
        );
        self
    }

    /// Register a grouped (website-like) target
    pub fn with_group(mut self, code: &str, id: u64) -> Self {
        self.targets.insert(
            code.to_string(),
            ScopeTarget {
                id: ScopeId(id),
                code: code.to_string(),
                level: ScopeLevel::Group,
            },
        );
        self
    }
}

impl ScopeDirectory for MemoryScopeDirectory {
    fn resolve(&self, code: &str) -> Result<ScopeTarget> {
        self.targets
            .get(code)
            .cloned()
            .ok_or_else(|| Error::UnknownScope {
                code: code.to_string(),
            })
    }
}
