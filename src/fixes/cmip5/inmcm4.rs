//! inmcm4

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::{document_metadata, rewrite_document, scale};

pub const NBP_STANDARD_NAME: &str = concat!(
    "surface_net_downward_mass_flux_of_carbon_dioxide_",
    "expressed_as_carbon_due_to_all_land_processes"
);

/// Sign convention is reversed.
#[derive(Debug, Default)]
pub struct Gpp;

impl Fix for Gpp {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, -1.0))
    }
}

/// Leaf area index written in percent.
#[derive(Debug, Default)]
pub struct Lai;

impl Fix for Lai {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 0.01))
    }
}

/// The file declares a standard name that is not in the CF table, which makes
/// strict loaders reject it, so the file itself is rewritten before loading.
#[derive(Debug, Default)]
pub struct Nbp;

impl Fix for Nbp {
    fn fix_file(&self, path: &Path) -> Result<PathBuf> {
        rewrite_document(path, |document| {
            document_metadata(document)?.insert(
                "standard_name".to_string(),
                Value::String(NBP_STANDARD_NAME.to_string()),
            );
            Ok(())
        })
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "inmcm4")
        .variable::<Gpp>("gpp")
        .variable::<Lai>("lai")
        .variable::<Nbp>("nbp");
}
