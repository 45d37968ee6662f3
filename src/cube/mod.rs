//! Minimal labeled N-dimensional array that fixes operate on.
//!
//! A [`Cube`] carries a metadata record (names, units, free-form attributes),
//! one dimension coordinate per axis and an [`ArrayD`] of values. Missing
//! values are `NaN`. The array shape always equals the coordinate lengths:
//! coordinates inside a cube are only reachable through [`CoordMut`], which
//! can rewrite points and bounds but never change how many there are.

pub mod collapse;
pub mod ops;

use std::collections::BTreeMap;
use std::ops::Deref;

use ndarray::{Array1, ArrayD, ArrayViewMutD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{FixError, Result};

pub use collapse::Aggregator;

/// Units string used when a document does not declare any.
pub const UNKNOWN_UNITS: &str = "unknown";

fn unknown_units() -> String {
    UNKNOWN_UNITS.to_string()
}

/// Descriptive record attached to a cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    pub var_name: String,
    #[serde(default = "unknown_units")]
    pub units: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cell_methods: Vec<String>,
}

impl CubeMetadata {
    pub fn new(var_name: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            standard_name: None,
            long_name: None,
            var_name: var_name.into(),
            units: units.into(),
            attributes: BTreeMap::new(),
            cell_methods: Vec::new(),
        }
    }

    pub fn with_standard_name(mut self, standard_name: impl Into<String>) -> Self {
        self.standard_name = Some(standard_name.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Dimension coordinate for one axis of a cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub name: String,
    #[serde(default = "unknown_units")]
    pub units: String,
    points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
}

impl Coord {
    pub fn new(name: impl Into<String>, units: impl Into<String>, points: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            points,
            bounds: None,
            calendar: None,
        }
    }

    /// Attach one `[lower, upper]` pair per point.
    pub fn with_bounds(mut self, bounds: Vec<[f64; 2]>) -> Result<Self> {
        self.check_bounds(&bounds)?;
        self.bounds = Some(bounds);
        Ok(self)
    }

    pub fn with_calendar(mut self, calendar: impl Into<String>) -> Self {
        self.calendar = Some(calendar.into());
        self
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn bounds(&self) -> Option<&[[f64; 2]]> {
        self.bounds.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn check_bounds(&self, bounds: &[[f64; 2]]) -> Result<()> {
        if bounds.len() != self.points.len() {
            return Err(FixError::ShapeMismatch {
                expected: vec![self.points.len(), 2],
                found: vec![bounds.len(), 2],
            });
        }
        Ok(())
    }
}

/// Mutable access to a coordinate that belongs to a cube.
///
/// Everything except the number of points can change.
pub struct CoordMut<'a> {
    coord: &'a mut Coord,
}

impl Deref for CoordMut<'_> {
    type Target = Coord;

    fn deref(&self) -> &Coord {
        self.coord
    }
}

impl CoordMut<'_> {
    pub fn set_units(&mut self, units: impl Into<String>) {
        self.coord.units = units.into();
    }

    pub fn set_calendar(&mut self, calendar: Option<String>) {
        self.coord.calendar = calendar;
    }

    pub fn points_mut(&mut self) -> &mut [f64] {
        &mut self.coord.points
    }

    pub fn bounds_mut(&mut self) -> Option<&mut [[f64; 2]]> {
        self.coord.bounds.as_deref_mut()
    }

    pub fn set_bounds(&mut self, bounds: Option<Vec<[f64; 2]>>) -> Result<()> {
        if let Some(bounds) = &bounds {
            self.coord.check_bounds(bounds)?;
        }
        self.coord.bounds = bounds;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CubeDocument", into = "CubeDocument")]
pub struct Cube {
    pub metadata: CubeMetadata,
    coords: Vec<Coord>,
    data: ArrayD<f64>,
}

impl Cube {
    /// Build a cube from row-major values. `data` must hold exactly one value
    /// per grid cell of `coords`.
    pub fn new(metadata: CubeMetadata, coords: Vec<Coord>, data: Vec<f64>) -> Result<Self> {
        let shape: Vec<usize> = coords.iter().map(Coord::len).collect();
        let found = data.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|_| {
            FixError::ShapeMismatch {
                expected: shape.clone(),
                found: vec![found],
            }
        })?;
        Self::from_array(metadata, coords, data)
    }

    /// Build a cube around an existing array whose shape matches `coords`.
    pub fn from_array(
        metadata: CubeMetadata,
        coords: Vec<Coord>,
        data: ArrayD<f64>,
    ) -> Result<Self> {
        let shape: Vec<usize> = coords.iter().map(Coord::len).collect();
        if data.shape() != shape.as_slice() {
            return Err(FixError::ShapeMismatch {
                expected: shape,
                found: data.shape().to_vec(),
            });
        }
        for coord in &coords {
            if let Some(bounds) = &coord.bounds {
                coord.check_bounds(bounds)?;
            }
        }
        Ok(Self {
            metadata,
            coords,
            data,
        })
    }

    /// One-dimensional cube over an index coordinate named `index`.
    pub fn vector(var_name: impl Into<String>, values: Vec<f64>) -> Self {
        let index = Coord::new("index", "1", (0..values.len()).map(|i| i as f64).collect());
        Self {
            metadata: CubeMetadata::new(var_name, UNKNOWN_UNITS),
            coords: vec![index],
            data: Array1::from(values).into_dyn(),
        }
    }

    /// Best available name: standard name, then long name, then variable name.
    pub fn name(&self) -> &str {
        self.metadata
            .standard_name
            .as_deref()
            .or(self.metadata.long_name.as_deref())
            .unwrap_or(&self.metadata.var_name)
    }

    pub fn var_name(&self) -> &str {
        &self.metadata.var_name
    }

    pub fn units(&self) -> &str {
        &self.metadata.units
    }

    pub fn shape(&self) -> Vec<usize> {
        self.data.shape().to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Values can be rewritten in place; the shape is fixed.
    pub fn data_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        self.data.view_mut()
    }

    /// Values in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Coord> {
        self.coords.iter().find(|c| c.name == name)
    }

    pub fn coord_mut(&mut self, name: &str) -> Option<CoordMut<'_>> {
        self.coords
            .iter_mut()
            .find(|c| c.name == name)
            .map(|coord| CoordMut { coord })
    }

    /// Like [`Cube::coord_mut`] but a missing coordinate is an error.
    pub fn require_coord_mut(&mut self, name: &str) -> Result<CoordMut<'_>> {
        self.coord_mut(name).ok_or_else(|| FixError::MissingCoord {
            coord: name.to_string(),
        })
    }

    pub fn dim_index(&self, name: &str) -> Option<usize> {
        self.coords.iter().position(|c| c.name == name)
    }

    /// Replace every value matching `predicate` with `NaN`.
    pub fn mask_where(&mut self, predicate: impl Fn(f64) -> bool) -> usize {
        let mut masked = 0;
        for value in self.data.iter_mut().filter(|v| !v.is_nan()) {
            if predicate(*value) {
                *value = f64::NAN;
                masked += 1;
            }
        }
        masked
    }

    pub fn masked_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

/// Serialized form of a cube. Missing values travel as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CubeDocument {
    metadata: CubeMetadata,
    #[serde(default)]
    coords: Vec<Coord>,
    data: Vec<Option<f64>>,
}

impl TryFrom<CubeDocument> for Cube {
    type Error = FixError;

    fn try_from(doc: CubeDocument) -> Result<Self> {
        let data = doc.data.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Cube::new(doc.metadata, doc.coords, data)
    }
}

impl From<Cube> for CubeDocument {
    fn from(cube: Cube) -> Self {
        let data = cube
            .data
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        CubeDocument {
            metadata: cube.metadata,
            coords: cube.coords,
            data,
        }
    }
}
