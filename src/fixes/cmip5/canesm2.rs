//! CanESM2

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::scale;

#[derive(Debug, Default)]
pub struct Fgco2;

impl Fix for Fgco2 {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 12.0 / 44.0))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder.model(CMIP5, "CanESM2").variable::<Fgco2>("fgco2");
}
