//! MPI-ESM-LR

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::scale;

#[derive(Debug, Default)]
pub struct Pctisccp;

impl Fix for Pctisccp {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 100.0))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder.model(CMIP5, "MPI-ESM-LR").variable::<Pctisccp>("pctisccp");
}
