//! CCSM4

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::{round_coord, set_units};

/// Radiation fields carry latitudes with float noise that breaks grid
/// comparisons against other CCSM4 output.
#[derive(Debug, Default)]
pub struct RadiationLatitude;

impl Fix for RadiationLatitude {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        round_coord(cube, "latitude", 4)
    }
}

/// Salinity declared in psu instead of 1e-3.
#[derive(Debug, Default)]
pub struct So;

impl Fix for So {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(set_units(cube, "1e3"))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "CCSM4")
        .variable::<RadiationLatitude>("rlut")
        .variable::<RadiationLatitude>("rlutcs")
        .variable::<RadiationLatitude>("rsut")
        .variable::<RadiationLatitude>("rsutcs")
        .variable::<So>("so");
}
