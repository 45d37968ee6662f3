//! Building blocks shared by the per-model fixes

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cube::Cube;
use crate::error::{FixError, Result};
use crate::paths;

/// Multiply every value by `factor`. The metadata record is left exactly as
/// it was, only the numbers change.
pub fn scale(mut cube: Cube, factor: f64) -> Cube {
    cube *= factor;
    cube
}

/// Declare new units without touching the values.
pub fn set_units(mut cube: Cube, units: &str) -> Cube {
    cube.metadata.units = units.to_string();
    cube
}

/// Round the points (and bounds, if any) of coordinate `coord` to `decimals`
/// places. The coordinate must exist.
pub fn round_coord(mut cube: Cube, coord: &str, decimals: i32) -> Result<Cube> {
    let factor = 10f64.powi(decimals);
    let round = |v: f64| (v * factor).round() / factor;

    let mut coord = cube.require_coord_mut(coord)?;
    for point in coord.points_mut() {
        *point = round(*point);
    }
    if let Some(bounds) = coord.bounds_mut() {
        for [lower, upper] in bounds.iter_mut() {
            *lower = round(*lower);
            *upper = round(*upper);
        }
    }
    Ok(cube)
}

pub fn remove_attributes(mut cube: Cube, names: &[&str]) -> Cube {
    for name in names {
        cube.metadata.attributes.remove(*name);
    }
    cube
}

/// Load the JSON document at `path`, let `edit` change it and write the
/// result to a newly created fixed path. The source file is not modified and
/// no existing file is ever overwritten.
pub fn rewrite_document<F>(path: &Path, edit: F) -> Result<PathBuf>
where
    F: FnOnce(&mut serde_json::Value) -> Result<()>,
{
    if !path.exists() {
        return Err(FixError::MissingFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let mut document: serde_json::Value = serde_json::from_str(&content)?;
    edit(&mut document)?;

    let (target, mut file) = paths::create_fixed_file(path)?;
    file.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;
    debug!("Rewrote {} into {}", path.display(), target.display());
    Ok(target)
}

/// Mutable handle on the `metadata` object of a cube document.
pub fn document_metadata(
    document: &mut serde_json::Value,
) -> Result<&mut serde_json::Map<String, serde_json::Value>> {
    document
        .get_mut("metadata")
        .and_then(serde_json::Value::as_object_mut)
        .ok_or_else(|| FixError::MissingAttribute {
            attribute: "metadata".to_string(),
        })
}
