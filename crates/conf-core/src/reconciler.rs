//! The generic diff-and-apply algorithm
//!
//! One [`EntityReconciler`] replaces the per-kind components of the source
//! system (blocks, pages, widgets, ...): everything kind-specific is data
//! in a [`ComponentProfile`], and everything backend-specific hides behind
//! the [`StoreAdapter`]. The algorithm for a single entity is:
//!
//! 1. look up existing entities, disambiguating by scope when needed
//! 2. apply the version/mode gate (before any diffing or content I/O)
//! 3. create-or-reuse the persisted record
//! 4. check required attributes, fill defaults
//! 5. resolve the content source, if any
//! 6. diff attributes with weak equality, setting only what differs
//! 7. overwrite the scope-assignment list (unconditional, see below)
//! 8. save when dirty or newly created, otherwise no-op
//! 9. write the version stamp back
//!
//! Scope assignment is overwritten even when identical: comparing
//! scope-assignment sets reliably is deferred, so a scope-only change does
//! not by itself trigger a save. Known limitation.

use conf_model::{AttrValue, EntitySpec, weak_eq};

use crate::adapter::{ContentResolver, EntityRecord, StoreAdapter};
use crate::error::{Error, Result};
use crate::mode::ApplyMode;
use crate::reporter::{DiffReporter, ReportLevel, TracingReporter};
use crate::scope::{ScopeId, ScopeResolver};
use crate::version::{VersionStore, version_key};

/// Kind-specific knobs for one entity kind
///
/// Collapses what used to be a class per kind into plain data: the alias
/// used in version keys and log lines, attributes a spec must carry,
/// defaults filled in when absent, and the attribute that resolved
/// `source` content lands in.
#[derive(Debug, Clone)]
pub struct ComponentProfile {
    alias: String,
    required_attributes: Vec<String>,
    default_attributes: Vec<(String, AttrValue)>,
    content_attribute: String,
}

impl ComponentProfile {
    /// A profile with no required attributes and no defaults
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            required_attributes: Vec::new(),
            default_attributes: Vec::new(),
            content_attribute: "content".to_string(),
        }
    }

    /// Attributes every spec of this kind must carry
    pub fn with_required<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Defaults applied when a spec leaves an attribute unset
    pub fn with_defaults<I, S, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<AttrValue>,
    {
        self.default_attributes = defaults
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    /// Target attribute for resolved `source` content (default `content`)
    pub fn with_content_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.content_attribute = attribute.into();
        self
    }

    /// The component alias (version-key prefix)
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// What happened to one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new or changed entity was persisted
    Saved,
    /// The entity already matched the spec; nothing written
    Unchanged,
    /// Create-only mode left an existing entity untouched
    SkippedExisting,
}

/// Reconciles single entities against their desired specs
pub struct EntityReconciler<A: StoreAdapter> {
    profile: ComponentProfile,
    adapter: A,
    scopes: ScopeResolver,
    versions: VersionStore,
    content: Option<Box<dyn ContentResolver>>,
    reporter: Box<dyn DiffReporter>,
}

impl<A: StoreAdapter> EntityReconciler<A> {
    /// Create a reconciler from its collaborators
    ///
    /// Reporting defaults to [`TracingReporter`]; no content resolver is
    /// configured, so specs carrying `source` fail until one is set.
    pub fn new(
        profile: ComponentProfile,
        adapter: A,
        scopes: ScopeResolver,
        versions: VersionStore,
    ) -> Self {
        Self {
            profile,
            adapter,
            scopes,
            versions,
            content: None,
            reporter: Box::new(TracingReporter),
        }
    }

    /// Attach a content resolver for the reserved `source` key
    pub fn with_content_resolver(mut self, resolver: Box<dyn ContentResolver>) -> Self {
        self.content = Some(resolver);
        self
    }

    /// Replace the event sink
    pub fn with_reporter(mut self, reporter: Box<dyn DiffReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The kind profile
    pub fn profile(&self) -> &ComponentProfile {
        &self.profile
    }

    /// The store adapter (mainly for drivers and tests)
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable adapter access
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// The version store
    pub fn versions(&self) -> &VersionStore {
        &self.versions
    }

    /// The event sink
    pub fn reporter(&self) -> &dyn DiffReporter {
        self.reporter.as_ref()
    }

    /// Reconcile one identifier against one desired spec
    ///
    /// # Errors
    ///
    /// Any [`Error`] aborts only this entity; the runner records it and
    /// continues with the rest of the document.
    pub fn reconcile(
        &mut self,
        identifier: &str,
        spec: &EntitySpec,
        mode: ApplyMode,
    ) -> Result<ReconcileOutcome> {
        self.reporter.record(
            ReportLevel::Comment,
            &format!(
                "Checking for existing {} entries with identifier '{}'",
                self.profile.alias, identifier
            ),
            0,
        );

        let key = version_key(&self.profile.alias, identifier, spec.scopes());
        let is_new_version = match spec.version() {
            Some(version) => self.versions.is_new_version(&key, version),
            None => false,
        };

        let existing = self.find_existing(identifier, spec.scopes())?;

        if mode.should_skip_existing(existing.is_some(), is_new_version) {
            self.reporter.record(
                ReportLevel::Comment,
                &format!("'{identifier}' exists, skip modifying it (create mode)"),
                0,
            );
            return Ok(ReconcileOutcome::SkippedExisting);
        }

        let (mut entity, force_save) = match existing {
            Some(entity) => (entity, false),
            None => (self.adapter.create(identifier), true),
        };

        for required in &self.profile.required_attributes {
            if spec.attribute(required).is_none() {
                return Err(Error::RequiredAttributeMissing {
                    attribute: required.clone(),
                });
            }
        }

        let mut dirty = false;

        // Content inclusion happens only past the gate, so skipped
        // entities never touch the resolver.
        if let Some(reference) = spec.source() {
            let resolver = self.content.as_deref().ok_or_else(|| Error::ContentUnresolved {
                reference: reference.to_string(),
            })?;
            let resolved = AttrValue::Str(resolver.resolve(reference)?);
            let attribute = self.profile.content_attribute.clone();
            dirty |= apply_attribute(
                self.reporter.as_ref(),
                &mut entity,
                identifier,
                &attribute,
                resolved,
            );
        }

        for (name, desired) in spec.attributes() {
            dirty |= apply_attribute(
                self.reporter.as_ref(),
                &mut entity,
                identifier,
                name,
                desired.clone(),
            );
        }

        for (name, default) in &self.profile.default_attributes {
            if spec.attribute(name).is_some() {
                continue;
            }
            if spec.source().is_some() && *name == self.profile.content_attribute {
                continue;
            }
            dirty |= apply_attribute(
                self.reporter.as_ref(),
                &mut entity,
                identifier,
                name,
                default.clone(),
            );
        }

        let scope_ids: Vec<ScopeId> = if spec.scopes().is_empty() {
            vec![ScopeId::GLOBAL]
        } else {
            self.scopes
                .resolve_all(spec.scopes())?
                .into_iter()
                .map(|target| target.id)
                .collect()
        };
        entity.set_scope_ids(scope_ids);

        let outcome = if dirty || force_save {
            self.adapter.save(entity)?;
            self.reporter.record(
                ReportLevel::Info,
                &format!("Saved {} '{}'", self.profile.alias, identifier),
                0,
            );
            ReconcileOutcome::Saved
        } else {
            self.reporter.record(
                ReportLevel::Comment,
                &format!("No changes for {} '{}'", self.profile.alias, identifier),
                0,
            );
            ReconcileOutcome::Unchanged
        };

        // Written even on the unchanged branch so re-runs at the same
        // stamp stay stable; the gate's skip path returns earlier and
        // leaves the store untouched.
        if let Some(version) = spec.version() {
            self.versions.set_version(&key, version);
        }

        Ok(outcome)
    }

    /// Find the one entity a spec addresses, or none to take the create
    /// branch
    ///
    /// With several candidates and no scope path there is nothing to
    /// disambiguate by, so the spec is treated as addressing a record that
    /// does not exist yet. With a scope path, the first code's target
    /// filters the lookup; more than one survivor is an error rather than
    /// a guess.
    fn find_existing(&self, identifier: &str, scope_codes: &[String]) -> Result<Option<A::Entity>> {
        let mut candidates = self.adapter.find(identifier, None)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        if scope_codes.is_empty() {
            if candidates.len() == 1 {
                return Ok(Some(candidates.remove(0)));
            }
            return Ok(None);
        }

        let target = self.scopes.lookup_target(scope_codes)?;
        let mut filtered = self.adapter.find(identifier, Some(&target))?;
        match filtered.len() {
            0 => Ok(None),
            1 => Ok(Some(filtered.remove(0))),
            count => Err(Error::AmbiguousMatch {
                identifier: identifier.to_string(),
                count,
            }),
        }
    }
}

/// Diff one attribute; set it and report when it differs
fn apply_attribute<E: EntityRecord>(
    reporter: &dyn DiffReporter,
    entity: &mut E,
    identifier: &str,
    name: &str,
    desired: AttrValue,
) -> bool {
    let current = entity.get(name).cloned().unwrap_or(AttrValue::Null);
    let id_label = entity
        .storage_id()
        .map_or_else(|| "new".to_string(), |id| id.to_string());

    reporter.record(
        ReportLevel::Comment,
        &format!("Checking {identifier} ({id_label}), key {name} => {current}"),
        1,
    );

    if weak_eq(&current, &desired) {
        return false;
    }

    reporter.record(
        ReportLevel::Info,
        &format!("Set {identifier} ({id_label}), key {name} => {desired}"),
        1,
    );
    entity.set(name, desired);
    true
}
