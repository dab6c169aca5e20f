//! Apply-mode policy
//!
//! Two modes govern how existing entities are treated. `Maintain` always
//! reconciles; `CreateOnly` leaves existing entities alone unless the spec
//! carries a version stamp newer than the stored one. The gate is a pure
//! function and is evaluated before any attribute diffing, so a skipped
//! entity causes no side effects (in particular no content-source
//! resolution).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How existing entities are treated during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    /// Always reconcile, creating or updating as needed
    Maintain,
    /// Skip existing entities unless a newer version stamp forces an update
    CreateOnly,
}

impl ApplyMode {
    /// Whether an existing entity should be skipped outright
    ///
    /// True only for `CreateOnly` with an existing entity and no newer
    /// version stamp. This is the sole idempotence/versioning override.
    pub fn should_skip_existing(self, entity_exists: bool, is_new_version: bool) -> bool {
        self == ApplyMode::CreateOnly && entity_exists && !is_new_version
    }
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyMode::Maintain => write!(f, "maintain"),
            ApplyMode::CreateOnly => write!(f, "create"),
        }
    }
}

impl FromStr for ApplyMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "maintain" => Ok(ApplyMode::Maintain),
            "create" | "create-only" => Ok(ApplyMode::CreateOnly),
            other => Err(crate::Error::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}
