//! MIROC-ESM

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::scale;

/// Ozone written in ppmv where ppbv is declared.
#[derive(Debug, Default)]
pub struct Tro3;

impl Fix for Tro3 {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 1000.0))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder.model(CMIP5, "MIROC-ESM").variable::<Tro3>("tro3");
}
