use std::fmt;

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use super::Cube;
use crate::error::{FixError, Result};

/// Reduction applied when collapsing a cube along a dimension.
/// Missing (`NaN`) values are ignored; an all-missing slice yields `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    Mean,
    Sum,
    Min,
    Max,
}

impl Aggregator {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregator::Mean => "mean",
            Aggregator::Sum => "sum",
            Aggregator::Min => "minimum",
            Aggregator::Max => "maximum",
        }
    }

    fn aggregate(&self, values: impl Iterator<Item = f64>) -> f64 {
        let mut count = 0usize;
        let mut acc = match self {
            Aggregator::Mean | Aggregator::Sum => 0.0,
            Aggregator::Min => f64::INFINITY,
            Aggregator::Max => f64::NEG_INFINITY,
        };
        for value in values.filter(|v| !v.is_nan()) {
            count += 1;
            acc = match self {
                Aggregator::Mean | Aggregator::Sum => acc + value,
                Aggregator::Min => acc.min(value),
                Aggregator::Max => acc.max(value),
            };
        }
        if count == 0 {
            return f64::NAN;
        }
        match self {
            Aggregator::Mean => acc / count as f64,
            _ => acc,
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Cube {
    /// Reduce along the dimension named `dim`, dropping its coordinate and
    /// recording a `"<dim>: <method>"` cell method.
    pub fn collapsed(&self, dim: &str, aggregator: Aggregator) -> Result<Cube> {
        let axis = self
            .dim_index(dim)
            .ok_or_else(|| FixError::DimensionNotFound(dim.to_string()))?;

        let reduced = self
            .data
            .map_axis(Axis(axis), |lane| aggregator.aggregate(lane.iter().copied()));

        let mut coords = self.coords().to_vec();
        coords.remove(axis);
        let mut metadata = self.metadata.clone();
        metadata.cell_methods.push(format!("{}: {}", dim, aggregator));

        Cube::from_array(metadata, coords, reduced)
    }
}
