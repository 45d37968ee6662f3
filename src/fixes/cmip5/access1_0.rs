//! ACCESS1-0 and ACCESS1-3

use crate::catalog::CatalogBuilder;
use crate::constants::CMIP5;
use crate::cube::Cube;
use crate::error::Result;
use crate::fix::Fix;

/// Time axis is written without a calendar; the model runs on the Gregorian one.
#[derive(Debug, Default)]
pub struct AllVars;

impl Fix for AllVars {
    fn fix_metadata(&self, mut cube: Cube) -> Result<Cube> {
        if let Some(mut time) = cube.coord_mut("time") {
            time.set_calendar(Some("gregorian".to_string()));
        }
        Ok(cube)
    }
}

pub fn register(builder: &mut CatalogBuilder) {
    builder.model(CMIP5, "ACCESS1-0").all_vars::<AllVars>();
    // ACCESS1-3 shares the ACCESS1-0 output pipeline
    builder.model(CMIP5, "ACCESS1-3").derived_from("ACCESS1-0");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Coord, CubeMetadata};

    #[test]
    fn test_sets_gregorian_calendar() {
        let cube = Cube::new(
            CubeMetadata::new("tas", "K"),
            vec![Coord::new("time", "days since 0001-01-01", vec![0.0, 31.0])],
            vec![280.0, 281.0],
        )
        .unwrap();
        let cube = AllVars.fix_metadata(cube).unwrap();
        assert_eq!(cube.coord("time").unwrap().calendar.as_deref(), Some("gregorian"));
    }

    #[test]
    fn test_cube_without_time_is_untouched() {
        let cube = Cube::vector("sftlf", vec![50.0]);
        let reference = cube.clone();
        assert_eq!(AllVars.fix_metadata(cube).unwrap(), reference);
    }
}
