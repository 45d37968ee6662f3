//! Process-wide registry of known model quirks.
//!
//! Entries are keyed by (project, normalized model). Each holds an optional
//! generic factory registered under [`ALL_VARIABLES`] plus one factory per
//! variable name. Derivation between models is flattened by
//! [`CatalogBuilder::build`], so a built catalog is a plain read-only map.

pub mod builder;
pub mod defaults;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::constants::ALL_VARIABLES;
use crate::fix::Fix;

pub use builder::{CatalogBuilder, ModelEntryBuilder};
pub use defaults::{builtin_catalog, default_catalog};

/// Produces a fresh fix instance for each resolution.
pub type FixFactory = Arc<dyn Fn() -> Box<dyn Fix> + Send + Sync>;

/// Factory for a fix type that needs no parameters.
pub fn factory<F: Fix + Default>() -> FixFactory {
    Arc::new(|| Box::new(F::default()) as Box<dyn Fix>)
}

/// Flattened fix-set of one (project, model)
#[derive(Clone, Default)]
pub struct CatalogEntry {
    fixes: BTreeMap<String, FixFactory>,
}

impl CatalogEntry {
    pub(crate) fn insert(&mut self, name: String, factory: FixFactory) {
        self.fixes.insert(name, factory);
    }

    pub(crate) fn extend_from(&mut self, other: &CatalogEntry) {
        for (name, factory) in &other.fixes {
            self.fixes.insert(name.clone(), Arc::clone(factory));
        }
    }

    pub fn generic(&self) -> Option<&FixFactory> {
        self.fixes.get(ALL_VARIABLES)
    }

    /// Factory registered under exactly `variable`. The generic entry is not
    /// reachable through this method.
    pub fn variable(&self, variable: &str) -> Option<&FixFactory> {
        if variable == ALL_VARIABLES {
            return None;
        }
        self.fixes.get(variable)
    }

    /// Variable names with a specific fix, sorted.
    pub fn variables(&self) -> Vec<&str> {
        self.fixes
            .keys()
            .map(String::as_str)
            .filter(|name| *name != ALL_VARIABLES)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("fixes", &self.fixes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CatalogKey {
    pub project: String,
    pub model: String,
}

impl CatalogKey {
    pub fn new(project: &str, model: &str) -> Self {
        Self {
            project: project.to_string(),
            model: model.to_string(),
        }
    }
}

/// Read-only registry built by [`CatalogBuilder`]. Model names passed to the
/// lookup methods must already be normalized.
#[derive(Debug, Default)]
pub struct FixCatalog {
    entries: HashMap<CatalogKey, CatalogEntry>,
}

impl FixCatalog {
    pub(crate) fn from_entries(entries: HashMap<CatalogKey, CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, project: &str, model: &str) -> Option<&CatalogEntry> {
        self.entries.get(&CatalogKey::new(project, model))
    }

    pub fn contains(&self, project: &str, model: &str) -> bool {
        self.entry(project, model).is_some()
    }

    pub fn has_generic(&self, project: &str, model: &str) -> bool {
        self.entry(project, model)
            .map_or(false, |entry| entry.generic().is_some())
    }

    /// All projects with at least one entry, sorted.
    pub fn projects(&self) -> Vec<&str> {
        let mut projects: Vec<&str> = self.entries.keys().map(|k| k.project.as_str()).collect();
        projects.sort_unstable();
        projects.dedup();
        projects
    }

    /// Normalized model names registered for `project`, sorted.
    pub fn models(&self, project: &str) -> Vec<&str> {
        let mut models: Vec<&str> = self
            .entries
            .keys()
            .filter(|k| k.project == project)
            .map(|k| k.model.as_str())
            .collect();
        models.sort_unstable();
        models
    }

    pub fn variables(&self, project: &str, model: &str) -> Vec<&str> {
        self.entry(project, model)
            .map(CatalogEntry::variables)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
