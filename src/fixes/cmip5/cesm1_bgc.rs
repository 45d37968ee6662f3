//! CESM1-BGC

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;
use crate::fixes::common::scale;

const YEAR_ZERO_UNITS: &str = "days since 0000-01-01 00:00:00";
const YEAR_ONE_UNITS: &str = "days since 0001-01-01 00:00:00";
const NOLEAP_YEAR_DAYS: f64 = 365.0;

/// Time axis references year zero, which does not exist in the noleap calendar.
#[derive(Debug, Default)]
pub struct AllVars;

impl Fix for AllVars {
    fn fix_metadata(&self, mut cube: Cube) -> Result<Cube> {
        if let Some(mut time) = cube.coord_mut("time") {
            if time.units == YEAR_ZERO_UNITS {
                time.set_units(YEAR_ONE_UNITS);
                for point in time.points_mut() {
                    *point -= NOLEAP_YEAR_DAYS;
                }
                if let Some(bounds) = time.bounds_mut() {
                    for [lower, upper] in bounds.iter_mut() {
                        *lower -= NOLEAP_YEAR_DAYS;
                        *upper -= NOLEAP_YEAR_DAYS;
                    }
                }
            }
        }
        Ok(cube)
    }
}

/// Mass mixing ratio relative to dry air.
#[derive(Debug, Default)]
pub struct Co2;

impl Fix for Co2 {
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(scale(cube, 28.966 / 44.0))
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .model(CMIP5, "CESM1-BGC")
        .all_vars::<AllVars>()
        .variable::<Co2>("co2");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Coord, CubeMetadata};

    #[test]
    fn test_time_axis_moves_to_year_one() {
        let cube = Cube::new(
            CubeMetadata::new("co2", "1e-6"),
            vec![Coord::new("time", YEAR_ZERO_UNITS, vec![380.0, 410.0])],
            vec![1.0, 2.0],
        )
        .unwrap();
        let cube = AllVars.fix_metadata(cube).unwrap();
        let time = cube.coord("time").unwrap();
        assert_eq!(time.units, YEAR_ONE_UNITS);
        assert_eq!(time.points(), &[15.0, 45.0]);
    }

    #[test]
    fn test_other_time_units_are_left_alone() {
        let cube = Cube::new(
            CubeMetadata::new("co2", "1e-6"),
            vec![Coord::new("time", "days since 1850-01-01", vec![0.0])],
            vec![1.0],
        )
        .unwrap();
        let reference = cube.clone();
        assert_eq!(AllVars.fix_metadata(cube).unwrap(), reference);
    }
}
