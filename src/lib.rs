//! Resolution and application of per-model fixes for climate model output.
//!
//! A [`FixCatalog`] records which fixes exist for each (project, model)
//! pair, a [`FixResolver`] turns a [`FixIdentity`] into an ordered chain of
//! fixes, and a [`FixPipeline`] runs that chain over a file and the cube
//! loaded from it.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod cube;
pub mod error;
pub mod fix;
pub mod fixes;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod paths;
pub mod pipeline;
pub mod resolver;

pub use catalog::{builtin_catalog, default_catalog, CatalogBuilder, FixCatalog, FixFactory};
pub use config::Config;
pub use cube::{Coord, Cube, CubeMetadata};
pub use error::{FixError, Result};
pub use fix::{DefaultFix, Fix};
pub use identity::FixIdentity;
pub use pipeline::{FixOutcome, FixPipeline, FixReport, FixStage, JsonCubeStore, Loader, Saver};
pub use resolver::FixResolver;
