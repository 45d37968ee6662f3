//! EC-EARTH

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::scale;

/// Fractions written as 0-1 instead of percent.
#[derive(Debug, Default)]
pub struct Sic;

impl Fix for Sic {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 100.0))
    }
}

#[derive(Debug, Default)]
pub struct Sftlf;

impl Fix for Sftlf {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 100.0))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "EC-EARTH")
        .variable::<Sic>("sic")
        .variable::<Sftlf>("sftlf");
}
