//! Desired-state documents and entity specs
//!
//! A document is an ordered mapping from entity identifier to one or more
//! [`EntitySpec`] variants of that identifier (multiple variants are
//! distinguished by scope). Parsing pulls the reserved keys (`version`,
//! `stores`/`scopes`, `source`) out of each spec; everything else is an
//! attribute to be diffed against the persisted entity.

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::value::AttrValue;

/// Reserved keys that are consumed at parse time and never diffed
const RESERVED_KEYS: [&str; 4] = ["version", "stores", "scopes", "source"];

/// One desired variant of an entity
///
/// Attribute order is preserved from the document, so diff logging follows
/// the author's layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySpec {
    version: Option<u64>,
    scopes: Vec<String>,
    source: Option<String>,
    attributes: Vec<(String, AttrValue)>,
}

impl EntitySpec {
    /// Create an empty spec (builder style, mostly for tests and drivers)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version stamp
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the scope path (ordered scope codes)
    pub fn with_scopes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the external content reference
    pub fn with_source(mut self, reference: impl Into<String>) -> Self {
        self.source = Some(reference.into());
        self
    }

    /// Append an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Version stamp, if the spec carries one
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Ordered scope codes; empty means the global scope
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// External content reference, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &[(String, AttrValue)] {
        &self.attributes
    }

    /// Look up a single attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Parse one spec from a YAML mapping, extracting reserved keys
    fn from_yaml(identifier: &str, value: YamlValue) -> Result<Self> {
        let YamlValue::Mapping(mapping) = value else {
            return Err(Error::InvalidDocument {
                reason: format!("spec for '{identifier}' is not a mapping"),
            });
        };

        let mut spec = EntitySpec::new();
        for (key, value) in mapping {
            let Some(key) = key.as_str().map(str::to_string) else {
                return Err(Error::InvalidDocument {
                    reason: format!("non-string attribute key in spec for '{identifier}'"),
                });
            };

            match key.as_str() {
                "version" => {
                    spec.version = Some(value.as_u64().ok_or_else(|| Error::InvalidVersion {
                        identifier: identifier.to_string(),
                    })?);
                }
                "stores" | "scopes" => {
                    spec.scopes = scope_list(identifier, value)?;
                }
                "source" => {
                    spec.source =
                        Some(
                            value
                                .as_str()
                                .map(str::to_string)
                                .ok_or_else(|| Error::InvalidSource {
                                    identifier: identifier.to_string(),
                                })?,
                        );
                }
                _ => {
                    let attr: AttrValue = serde_yaml::from_value(value)?;
                    spec.attributes.push((key, attr));
                }
            }
        }
        Ok(spec)
    }
}

/// Whether a key is reserved (never treated as an attribute)
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn scope_list(identifier: &str, value: YamlValue) -> Result<Vec<String>> {
    let invalid = || Error::InvalidScopeList {
        identifier: identifier.to_string(),
    };
    let YamlValue::Sequence(items) = value else {
        return Err(invalid());
    };
    items
        .into_iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// One document entry: an identifier with its spec variants
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    identifier: String,
    specs: Vec<EntitySpec>,
}

impl DocumentEntry {
    /// The entity identifier (stable across runs, independent of scope)
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The spec variants, in document order
    pub fn specs(&self) -> &[EntitySpec] {
        &self.specs
    }
}

/// An ordered desired-state document
///
/// Identifiers are unique within one document; an entry may carry several
/// spec variants keyed by scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredStateDocument {
    entries: Vec<DocumentEntry>,
}

impl DesiredStateDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from YAML (JSON parses too, as a YAML subset)
    ///
    /// The root must be a mapping from identifier to either a single spec
    /// mapping or a sequence of spec mappings.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML, duplicate identifiers, or
    /// malformed reserved keys.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let root: YamlValue = serde_yaml::from_str(input)?;
        let YamlValue::Mapping(mapping) = root else {
            return Err(Error::InvalidDocument {
                reason: "document root is not a mapping".to_string(),
            });
        };

        let mut document = Self::new();
        for (key, value) in mapping {
            let Some(identifier) = key.as_str().map(str::to_string) else {
                return Err(Error::InvalidDocument {
                    reason: "non-string identifier".to_string(),
                });
            };

            let specs = match value {
                YamlValue::Sequence(items) => items
                    .into_iter()
                    .map(|item| EntitySpec::from_yaml(&identifier, item))
                    .collect::<Result<Vec<_>>>()?,
                other => vec![EntitySpec::from_yaml(&identifier, other)?],
            };

            document.push_entry(identifier, specs)?;
        }
        Ok(document)
    }

    /// Append an entry, enforcing identifier uniqueness
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIdentifier`] if the identifier is already
    /// present.
    pub fn push_entry(&mut self, identifier: impl Into<String>, specs: Vec<EntitySpec>) -> Result<()> {
        let identifier = identifier.into();
        if self.entries.iter().any(|e| e.identifier == identifier) {
            return Err(Error::DuplicateIdentifier { identifier });
        }
        self.entries.push(DocumentEntry { identifier, specs });
        Ok(())
    }

    /// Entries in document order
    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Total number of spec variants across all entries
    pub fn spec_count(&self) -> usize {
        self.entries.iter().map(|e| e.specs.len()).sum()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
