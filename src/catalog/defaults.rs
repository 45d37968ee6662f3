use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{CatalogBuilder, FixCatalog};
use crate::error::Result;
use crate::fixes;

static DEFAULT_CATALOG: Lazy<Arc<FixCatalog>> = Lazy::new(|| {
    Arc::new(builtin_catalog().expect("built-in fix registrations are consistent"))
});

/// Build a catalog holding every fix shipped with the crate.
pub fn builtin_catalog() -> Result<FixCatalog> {
    let mut builder = CatalogBuilder::new();
    fixes::cmip5::register(&mut builder);
    builder.build()
}

/// Process-wide built-in catalog, built on first use and shared afterwards.
pub fn default_catalog() -> Arc<FixCatalog> {
    Arc::clone(&DEFAULT_CATALOG)
}
