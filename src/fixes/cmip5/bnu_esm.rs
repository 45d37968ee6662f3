//! BNU-ESM
//!
//! Tracer concentrations and carbon fluxes are written in the wrong units.

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::{scale, set_units};

/// Mass mixing ratio written where mole fraction is expected.
#[derive(Debug, Default)]
pub struct Ch4;

impl Fix for Ch4 {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(set_units(cube, "1e-9"))
    }

    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 29.0 / 16.0 * 1.0e9))
    }
}

#[derive(Debug, Default)]
pub struct Co2;

impl Fix for Co2 {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(set_units(cube, "1e-6"))
    }

    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 29.0 / 44.0 * 1.0e6))
    }
}

/// Flux of CO2 mass written where a flux of carbon mass is expected.
#[derive(Debug, Default)]
pub struct Fgco2;

impl Fix for Fgco2 {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(set_units(cube, "kg m-2 s-1"))
    }

    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 12.0 / 44.0))
    }
}

#[derive(Debug, Default)]
pub struct Spco2;

impl Fix for Spco2 {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 1.0e6))
    }
}

/// Missing values are stored as 1e36 without a fill value declared.
#[derive(Debug, Default)]
pub struct Od550aer;

impl Fix for Od550aer {
    fn fix_data(&self, mut cube: Cube) -> Result<Cube> {
        cube.mask_where(|v| v >= 1.0e36);
        Ok(cube)
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "BNU-ESM")
        .variable::<Ch4>("ch4")
        .variable::<Co2>("co2")
        .variable::<Fgco2>("fgco2")
        .variable::<Spco2>("spco2")
        .variable::<Od550aer>("od550aer");
}
