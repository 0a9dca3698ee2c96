//! Piecewise-linear lookup tables with edge clamping.
//!
//! Inputs outside the table domain return the nearest edge value. Several
//! pressure/temperature conversions rely on this to keep steam densities
//! finite and positive, so there is no extrapolation anywhere.

use crate::error::{TableError, TableResult};

/// One-dimensional interpolation table `y = f(x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Interpolator {
    /// Build a table from `(x, y)` points.
    ///
    /// Requires at least two points, finite values and strictly increasing x.
    pub fn new(points: &[(f64, f64)]) -> TableResult<Self> {
        if points.len() < 2 {
            return Err(TableError::TooFewPoints { len: points.len() });
        }
        for (index, &(x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(TableError::NonFinite { index });
            }
            if index > 0 && x <= points[index - 1].0 {
                return Err(TableError::NotIncreasing { index });
            }
        }
        Ok(Self::from_points(points))
    }

    /// Built-in tables are literal data checked by the unit tests below.
    pub(crate) fn from_points(points: &[(f64, f64)]) -> Self {
        debug_assert!(points.len() >= 2);
        debug_assert!(points.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            x: points.iter().map(|p| p.0).collect(),
            y: points.iter().map(|p| p.1).collect(),
        }
    }

    /// Evaluate with linear interpolation, clamping outside `[x_min, x_max]`.
    pub fn eval(&self, x: f64) -> f64 {
        let last = self.x.len() - 1;
        if x.is_nan() || x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[last] {
            return self.y[last];
        }
        // first index with x[i] > x; guaranteed in 1..=last by the checks above
        let hi = self.x.partition_point(|&xi| xi <= x);
        let lo = hi - 1;
        let span = self.x[hi] - self.x[lo];
        let t = (x - self.x[lo]) / span;
        self.y[lo] + t * (self.y[hi] - self.y[lo])
    }

    /// Swap axes, producing `x = f⁻¹(y)`. Requires strictly monotonic y.
    pub fn inverse(&self) -> TableResult<Self> {
        let increasing = self.y.windows(2).all(|w| w[0] < w[1]);
        let decreasing = self.y.windows(2).all(|w| w[0] > w[1]);
        let mut points: Vec<(f64, f64)> = self
            .y
            .iter()
            .copied()
            .zip(self.x.iter().copied())
            .collect();
        if decreasing {
            points.reverse();
        } else if !increasing {
            return Err(TableError::NotInvertible);
        }
        Ok(Self::from_points(&points))
    }

    /// Copy of this table with every y multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.iter().map(|y| y * factor).collect(),
        }
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Two-dimensional table: a family of 1-D curves indexed by `z`.
///
/// `eval(z, x)` interpolates each bracketing curve at `x`, then linearly in
/// `z`. Both axes clamp at the edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolator2D {
    z: Vec<f64>,
    curves: Vec<Interpolator>,
}

impl Interpolator2D {
    pub fn new(curves: Vec<(f64, Interpolator)>) -> TableResult<Self> {
        if curves.len() < 2 {
            return Err(TableError::TooFewPoints { len: curves.len() });
        }
        for index in 0..curves.len() {
            if !curves[index].0.is_finite() {
                return Err(TableError::NonFinite { index });
            }
            if index > 0 && curves[index].0 <= curves[index - 1].0 {
                return Err(TableError::NotIncreasing { index });
            }
        }
        let (z, curves) = curves.into_iter().unzip();
        Ok(Self { z, curves })
    }

    pub(crate) fn from_curves(curves: Vec<(f64, Interpolator)>) -> Self {
        debug_assert!(curves.windows(2).all(|w| w[0].0 < w[1].0));
        let (z, curves) = curves.into_iter().unzip();
        Self { z, curves }
    }

    pub fn eval(&self, z: f64, x: f64) -> f64 {
        let last = self.z.len() - 1;
        if z.is_nan() || z <= self.z[0] {
            return self.curves[0].eval(x);
        }
        if z >= self.z[last] {
            return self.curves[last].eval(x);
        }
        let hi = self.z.partition_point(|&zi| zi <= z);
        let lo = hi - 1;
        let t = (z - self.z[lo]) / (self.z[hi] - self.z[lo]);
        let a = self.curves[lo].eval(x);
        let b = self.curves[hi].eval(x);
        a + t * (b - a)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn eval_stays_within_y_range(x in -1e6_f64..1e6) {
            let t = Interpolator::new(&[(-10.0, 3.0), (0.0, -2.0), (5.0, 8.0), (50.0, 1.0)]).unwrap();
            let y = t.eval(x);
            prop_assert!((-2.0..=8.0).contains(&y));
        }
    }
}
