//! Version tracking for create-once semantics
//!
//! Each logical unit (component alias + identifier + scope signature) has a
//! monotonically increasing version number. A spec carrying a `version`
//! stamp newer than the stored one forces an update even in create-only
//! mode; an equal stamp is not new, so repeated runs with the same stamp
//! stay idempotent.
//!
//! The store is fail-open by contract: an unreachable or unprovisioned
//! backing yields version 0 on reads and swallows write failures, because
//! version bootstrapping must never abort a first-time run.

mod file;

pub use file::FileVersionBacking;

use crate::adapter::VersionBacking;

/// Prefix applied to every key in the backing store
pub const KEY_PREFIX: &str = "version_";

const DEFAULT_VERSION: u64 = 0;

/// Build the version key for one logical unit
///
/// Scope codes are joined with `_` and appended directly to
/// `alias + '_' + identifier`, with no separator before the first code —
/// the exact key shape the backing store has always held, kept stable so
/// existing records keep matching.
pub fn version_key(alias: &str, identifier: &str, scope_codes: &[String]) -> String {
    let mut key = format!("{alias}_{identifier}");
    key.push_str(&scope_codes.join("_"));
    key
}

/// Fail-open store of per-unit version numbers
pub struct VersionStore {
    backing: Box<dyn VersionBacking>,
}

impl VersionStore {
    /// Create a store over a backing
    pub fn new(backing: Box<dyn VersionBacking>) -> Self {
        Self { backing }
    }

    /// Stored version for a key, or 0
    ///
    /// Backing failures and unparseable values both yield 0; reconciliation
    /// is never blocked on the version table.
    pub fn current_version(&self, key: &str) -> u64 {
        match self.backing.load(&prefixed(key)) {
            Ok(Some(value)) => value.parse().unwrap_or(DEFAULT_VERSION),
            Ok(None) => DEFAULT_VERSION,
            Err(e) => {
                tracing::debug!("Version lookup for '{}' failed, assuming 0: {}", key, e);
                DEFAULT_VERSION
            }
        }
    }

    /// Create or update the record for a key
    ///
    /// Write failures are swallowed and logged: most likely the backing
    /// store has not been provisioned yet on a first run.
    pub fn set_version(&mut self, key: &str, version: u64) {
        if let Err(e) = self.backing.store(&prefixed(key), &version.to_string()) {
            tracing::debug!("Could not persist version {} for '{}': {}", version, key, e);
        }
    }

    /// Whether a stamp is strictly newer than the stored version
    ///
    /// Equal versions are not new.
    pub fn is_new_version(&self, key: &str, version: u64) -> bool {
        version > self.current_version(key)
    }
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}
