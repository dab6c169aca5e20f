//! Error types for conf-model

/// Result type for conf-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing desired-state documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The same identifier appears more than once in one document
    #[error("Duplicate identifier '{identifier}' in document")]
    DuplicateIdentifier { identifier: String },

    /// The reserved `version` key is not a non-negative integer
    #[error("Invalid version for '{identifier}': expected a non-negative integer")]
    InvalidVersion { identifier: String },

    /// The reserved `stores`/`scopes` key is not a list of strings
    #[error("Invalid scope list for '{identifier}': expected a list of scope codes")]
    InvalidScopeList { identifier: String },

    /// The reserved `source` key is not a string
    #[error("Invalid source for '{identifier}': expected a content reference string")]
    InvalidSource { identifier: String },

    /// The document root is not a mapping of identifier to spec(s)
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// YAML deserialization error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
