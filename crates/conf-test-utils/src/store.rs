//! In-memory store adapter
//!
//! A [`MemoryStore`] plays the persisted backend in tests: entities live in
//! a `Vec`, `find` hands out clones, and `save` upserts by storage id, so
//! the engine's "transient reference for one reconciliation" contract is
//! exercised for real.

use std::collections::BTreeMap;

use conf_core::{EntityRecord, Error, Result, ScopeId, ScopeTarget, StoreAdapter};
use conf_model::AttrValue;

/// An entity held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntity {
    id: Option<u64>,
    identifier: String,
    attributes: BTreeMap<String, AttrValue>,
    scope_ids: Vec<ScopeId>,
}

impl MemoryEntity {
    fn new(identifier: &str) -> Self {
        Self {
            id: None,
            identifier: identifier.to_string(),
            attributes: BTreeMap::new(),
            scope_ids: vec![ScopeId::GLOBAL],
        }
    }

    /// Current value of an attribute (assertion helper)
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Current scope assignment (assertion helper)
    pub fn scope_ids(&self) -> &[ScopeId] {
        &self.scope_ids
    }

    /// Storage id (assertion helper)
    pub fn id(&self) -> Option<u64> {
        self.id
    }
}

impl EntityRecord for MemoryEntity {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn storage_id(&self) -> Option<u64> {
        self.id
    }

    fn get(&self, attribute: &str) -> Option<&AttrValue> {
        self.attributes.get(attribute)
    }

    fn set(&mut self, attribute: &str, value: AttrValue) {
        self.attributes.insert(attribute.to_string(), value);
    }

    fn set_scope_ids(&mut self, scope_ids: Vec<ScopeId>) {
        self.scope_ids = scope_ids;
    }
}

/// In-memory [`StoreAdapter`] with seeding and failure injection
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: u64,
    entities: Vec<MemoryEntity>,
    save_count: usize,
    fail_saves: bool,
}

impl MemoryStore {
    /// An empty store
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Insert a pre-existing entity, returning its storage id
    pub fn seed<I, S, V>(&mut self, identifier: &str, attributes: I, scope_ids: Vec<ScopeId>) -> u64
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<AttrValue>,
    {
        let mut entity = MemoryEntity::new(identifier);
        entity.attributes = attributes
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        entity.scope_ids = scope_ids;

        let id = self.next_id.max(1);
        self.next_id = id + 1;
        entity.id = Some(id);
        self.entities.push(entity);
        id
    }

    /// Make every subsequent save fail with a storage error
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// First stored entity under an identifier
    pub fn entity(&self, identifier: &str) -> Option<&MemoryEntity> {
        self.entities.iter().find(|e| e.identifier == identifier)
    }

    /// All stored entities under an identifier
    pub fn entities(&self, identifier: &str) -> Vec<&MemoryEntity> {
        self.entities
            .iter()
            .filter(|e| e.identifier == identifier)
            .collect()
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// How many saves have been performed
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl StoreAdapter for MemoryStore {
    type Entity = MemoryEntity;

    fn find(&self, identifier: &str, scope: Option<&ScopeTarget>) -> Result<Vec<MemoryEntity>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.identifier == identifier)
            .filter(|e| scope.is_none_or(|target| e.scope_ids.contains(&target.id)))
            .cloned()
            .collect())
    }

    fn create(&self, identifier: &str) -> MemoryEntity {
        MemoryEntity::new(identifier)
    }

    fn save(&mut self, mut entity: MemoryEntity) -> Result<()> {
        if self.fail_saves {
            return Err(Error::storage("memory store save failure (injected)"));
        }

        if entity.id.is_none() {
            let id = self.next_id.max(1);
            self.next_id = id + 1;
            entity.id = Some(id);
        }

        match self.entities.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => *slot = entity,
            None => self.entities.push(entity),
        }
        self.save_count += 1;
        Ok(())
    }
}
