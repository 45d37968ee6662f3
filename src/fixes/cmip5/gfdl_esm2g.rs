//! GFDL-ESM2G
//!
//! Also the base fix-set for GFDL-CM2p1 and GFDL-CM3.

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::{remove_attributes, scale};

/// GFDL averaging bookkeeping that other tools trip over.
pub const AVERAGE_PERIOD_ATTRIBUTES: &[&str] = &[
    "Start time for average period",
    "End time for average period",
    "Length of average period",
];

#[derive(Debug, Default)]
pub struct AllVars;

impl Fix for AllVars {
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(remove_attributes(cube, AVERAGE_PERIOD_ATTRIBUTES))
    }
}

#[derive(Debug, Default)]
pub struct Co2;

impl Fix for Co2 {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 1.0e6))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "GFDL-ESM2G")
        .all_vars::<AllVars>()
        .variable::<Co2>("co2");
}
