use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{factory, CatalogEntry, CatalogKey, FixCatalog, FixFactory};
use crate::constants::ALL_VARIABLES;
use crate::error::{FixError, Result};
use crate::fix::Fix;
use crate::identity::normalize_model_name;

#[derive(Default)]
struct ModelRegistration {
    fixes: BTreeMap<String, FixFactory>,
    parent: Option<String>,
}

/// Collects model registrations and flattens derivations into a [`FixCatalog`].
///
/// ```
/// use cmor_fixes::catalog::CatalogBuilder;
/// use cmor_fixes::fix::DefaultFix;
///
/// let mut builder = CatalogBuilder::new();
/// builder.model("CMIP5", "GFDL-ESM2G").all_vars::<DefaultFix>();
/// builder
///     .model("CMIP5", "GFDL-CM2p1")
///     .derived_from("GFDL-ESM2G")
///     .variable::<DefaultFix>("sftof");
/// let catalog = builder.build().unwrap();
/// assert!(catalog.has_generic("CMIP5", "GFDL_CM2p1"));
/// ```
#[derive(Default)]
pub struct CatalogBuilder {
    registrations: HashMap<CatalogKey, ModelRegistration>,
}

/// Registration handle for one (project, model) returned by [`CatalogBuilder::model`]
pub struct ModelEntryBuilder<'a> {
    registration: &'a mut ModelRegistration,
}

impl<'a> ModelEntryBuilder<'a> {
    /// Register the fix applied to every variable of this model.
    pub fn all_vars<F: Fix + Default>(self) -> Self {
        self.all_vars_with(factory::<F>())
    }

    pub fn all_vars_with(self, factory: FixFactory) -> Self {
        self.registration.fixes.insert(ALL_VARIABLES.to_string(), factory);
        self
    }

    /// Register the fix for exactly `variable`.
    pub fn variable<F: Fix + Default>(self, variable: &str) -> Self {
        self.variable_with(variable, factory::<F>())
    }

    pub fn variable_with(self, variable: &str, factory: FixFactory) -> Self {
        self.registration.fixes.insert(variable.to_string(), factory);
        self
    }

    /// Start from `parent`'s fix-set (same project). Names registered on this
    /// model replace the inherited fix of the same name; the rest are kept.
    pub fn derived_from(self, parent: &str) -> Self {
        self.registration.parent = Some(normalize_model_name(parent));
        self
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) the registration for `model` in `project`.
    pub fn model(&mut self, project: &str, model: &str) -> ModelEntryBuilder<'_> {
        let key = CatalogKey::new(project, &normalize_model_name(model));
        ModelEntryBuilder {
            registration: self.registrations.entry(key).or_default(),
        }
    }

    /// Resolve every derivation and freeze the result.
    pub fn build(self) -> Result<FixCatalog> {
        let mut keys: Vec<&CatalogKey> = self.registrations.keys().collect();
        keys.sort_by(|a, b| (&a.project, &a.model).cmp(&(&b.project, &b.model)));

        let mut flattened = HashMap::with_capacity(keys.len());
        for key in keys {
            let mut visiting = Vec::new();
            flatten(key, &self.registrations, &mut flattened, &mut visiting)?;
        }

        debug!("Built fix catalog with {} model entries", flattened.len());
        Ok(FixCatalog::from_entries(flattened))
    }
}

fn flatten(
    key: &CatalogKey,
    registrations: &HashMap<CatalogKey, ModelRegistration>,
    flattened: &mut HashMap<CatalogKey, CatalogEntry>,
    visiting: &mut Vec<CatalogKey>,
) -> Result<()> {
    if flattened.contains_key(key) {
        return Ok(());
    }
    if visiting.contains(key) {
        let chain: Vec<&str> = visiting.iter().map(|k| k.model.as_str()).collect();
        return Err(FixError::Catalog(format!(
            "derivation cycle in {}: {} -> {}",
            key.project,
            chain.join(" -> "),
            key.model
        )));
    }

    let registration = registrations.get(key).ok_or_else(|| {
        let child = visiting.last().map(|k| k.model.as_str()).unwrap_or("?");
        FixError::Catalog(format!(
            "{} in {} derives from unknown model {}",
            child, key.project, key.model
        ))
    })?;

    let mut entry = CatalogEntry::default();
    if let Some(parent) = &registration.parent {
        let parent_key = CatalogKey::new(&key.project, parent);
        visiting.push(key.clone());
        flatten(&parent_key, registrations, flattened, visiting)?;
        visiting.pop();
        if let Some(parent_entry) = flattened.get(&parent_key) {
            entry.extend_from(parent_entry);
        }
    }
    for (name, factory) in &registration.fixes {
        entry.insert(name.clone(), FixFactory::clone(factory));
    }

    flattened.insert(key.clone(), entry);
    Ok(())
}
