//! Error types for conf-core

/// Result type for conf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reconciling a single entity
///
/// All of these are caught at the runner boundary: one entity's failure is
/// recorded in the run report and the run continues. Only version-backing
/// failures are swallowed below this level (the version store is
/// fail-open).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A named scope code does not resolve to a concrete target
    #[error("No scope with code '{code}' found")]
    UnknownScope { code: String },

    /// A spec lacks a mandatory attribute
    #[error("Required attribute missing: {attribute}")]
    RequiredAttributeMissing { attribute: String },

    /// Store adapter save/load failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// More than one persisted entity matched after scope disambiguation
    #[error("Ambiguous match for '{identifier}': {count} candidates")]
    AmbiguousMatch { identifier: String, count: usize },

    /// A spec carries a `source` reference that cannot be resolved
    #[error("Cannot resolve content source '{reference}'")]
    ContentUnresolved { reference: String },

    /// An apply-mode string is not a known mode
    #[error("Invalid mode: {mode}")]
    InvalidMode { mode: String },

    /// Document/model parse error
    #[error(transparent)]
    Model(#[from] conf_model::Error),

    /// Standard I/O error (file-backed version store)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error (file-backed version store)
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error (file-backed version store)
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Shorthand for a storage failure with a formatted message
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }
}
