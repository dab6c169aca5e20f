//! File-backed content resolver
//!
//! Resolves the reserved `source` key against files under a base directory,
//! so documents can reference markup or templates kept next to them instead
//! of inlining large values.

use std::path::PathBuf;

use crate::adapter::ContentResolver;
use crate::error::{Error, Result};

/// Resolves `source` references as paths relative to a base directory
#[derive(Debug, Clone)]
pub struct FileContentResolver {
    base_dir: PathBuf,
}

impl FileContentResolver {
    /// Resolve references relative to `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ContentResolver for FileContentResolver {
    fn resolve(&self, reference: &str) -> Result<String> {
        let path = self.base_dir.join(reference);
        std::fs::read_to_string(&path).map_err(|e| {
            Error::storage(format!("cannot read content '{}': {e}", path.display()))
        })
    }
}
