//! In-memory version backing with failure injection
//!
//! The handle is `Clone` and shares state, so a test can keep one clone to
//! inspect or break the backing while the engine owns the other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use conf_core::{Error, Result, VersionBacking};

#[derive(Debug, Default)]
struct State {
    records: HashMap<String, String>,
    fail: bool,
}

/// Shared, failable [`VersionBacking`]
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionBacking {
    state: Arc<Mutex<State>>,
}

impl MemoryVersionBacking {
    /// A fresh, working backing
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failure: while set, every load/store errors
    pub fn set_fail(&self, fail: bool) {
        self.state.lock().expect("version backing poisoned").fail = fail;
    }

    /// Raw stored value for a key (assertion helper)
    pub fn get(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .expect("version backing poisoned")
            .records
            .get(key)
            .cloned()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .expect("version backing poisoned")
            .records
            .len()
    }

    /// Whether no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VersionBacking for MemoryVersionBacking {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.lock().expect("version backing poisoned");
        if state.fail {
            return Err(Error::storage("version backing offline (injected)"));
        }
        Ok(state.records.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().expect("version backing poisoned");
        if state.fail {
            return Err(Error::storage("version backing offline (injected)"));
        }
        state.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
