//! Arithmetic on cube values. Metadata is never touched by these operators;
//! fixes that change the meaning of the values update `units` themselves.

use std::ops::{AddAssign, Div, DivAssign, Mul, MulAssign, SubAssign};

use super::Cube;
use crate::error::{FixError, Result};

impl MulAssign<f64> for Cube {
    fn mul_assign(&mut self, factor: f64) {
        self.data *= factor;
    }
}

impl DivAssign<f64> for Cube {
    fn div_assign(&mut self, divisor: f64) {
        self.data /= divisor;
    }
}

impl AddAssign<f64> for Cube {
    fn add_assign(&mut self, offset: f64) {
        self.data += offset;
    }
}

impl SubAssign<f64> for Cube {
    fn sub_assign(&mut self, offset: f64) {
        self.data -= offset;
    }
}

impl Mul<f64> for Cube {
    type Output = Cube;

    fn mul(mut self, factor: f64) -> Cube {
        self *= factor;
        self
    }
}

impl Div<f64> for Cube {
    type Output = Cube;

    fn div(mut self, divisor: f64) -> Cube {
        self /= divisor;
        self
    }
}

impl Cube {
    /// Element-wise `self - other`. Both cubes must have the same shape; the
    /// result keeps `self`'s metadata and coordinates.
    pub fn subtract(&self, other: &Cube) -> Result<Cube> {
        if self.data.shape() != other.data.shape() {
            return Err(FixError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        let mut difference = self.clone();
        difference.data -= &other.data;
        Ok(difference)
    }
}
