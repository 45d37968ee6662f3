use std::sync::Arc;

use tracing::debug;

use crate::catalog::{default_catalog, FixCatalog};
use crate::fix::Fix;
use crate::identity::FixIdentity;
use crate::metrics::ResolverMetrics;

/// Turns an identity into its ordered fix chain.
///
/// The chain holds the model's generic fix first (if any), then the fix
/// registered for the exact variable (if any). Anything the catalog does not
/// know about resolves to an empty chain rather than an error.
#[derive(Debug, Clone)]
pub struct FixResolver {
    catalog: Arc<FixCatalog>,
}

impl FixResolver {
    pub fn new(catalog: Arc<FixCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FixCatalog {
        &self.catalog
    }

    pub fn resolve(&self, identity: &FixIdentity) -> Vec<Box<dyn Fix>> {
        let model = identity.normalized_model();
        let Some(entry) = self.catalog.entry(identity.project(), &model) else {
            debug!("No fixes registered for {}", identity);
            ResolverMetrics::record_chain_resolved(0);
            return Vec::new();
        };

        let mut chain: Vec<Box<dyn Fix>> = Vec::with_capacity(2);
        if let Some(generic) = entry.generic() {
            chain.push(generic());
        }
        if let Some(specific) = entry.variable(identity.variable()) {
            chain.push(specific());
        }

        debug!(
            "Resolved {} fix(es) for {}: {:?}",
            chain.len(),
            identity,
            chain.iter().map(|f| f.fix_name()).collect::<Vec<_>>()
        );
        ResolverMetrics::record_chain_resolved(chain.len());
        chain
    }

    /// Shorthand for [`FixResolver::resolve`] on a freshly built identity.
    pub fn get_fixes(&self, project: &str, model: &str, variable: &str) -> Vec<Box<dyn Fix>> {
        self.resolve(&FixIdentity::new(project, model, variable))
    }
}

impl Default for FixResolver {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}
