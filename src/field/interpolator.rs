//! Bilinear lookup on a regular grid

use super::sampler::WarpField;
use crate::physics::math::{Scalar, Vector};

/// Bilinear interpolant over `(row, column) → value` on a regular grid.
///
/// Queries are bounds-checked: anything outside the sampled rectangle (or
/// NaN) yields the fill value instead of extrapolating.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceInterpolator {
    rows: Vec<Scalar>,
    columns: Vec<Scalar>,
    values: Vec<Scalar>,
    fill: Scalar,
}

impl SurfaceInterpolator {
    /// `values` are row-major, `rows.len() × columns.len()`.
    ///
    /// # Panics
    ///
    /// On a shape mismatch or an axis that is not strictly ascending.
    pub fn new(rows: Vec<Scalar>, columns: Vec<Scalar>, values: Vec<Scalar>, fill: Scalar) -> Self {
        assert_eq!(
            values.len(),
            rows.len() * columns.len(),
            "interpolator values must be rows × columns"
        );
        assert!(is_strictly_ascending(&rows), "row axis must be strictly ascending");
        assert!(is_strictly_ascending(&columns), "column axis must be strictly ascending");

        Self {
            rows,
            columns,
            values,
            fill,
        }
    }

    /// Interpolant over a sampled warp field, rows along `y` and columns along `x`
    pub fn from_field(field: &WarpField) -> Self {
        Self::new(
            field.mesh.rows().to_vec(),
            field.mesh.columns().to_vec(),
            field.grid.values().to_vec(),
            0.0,
        )
    }

    pub fn fill(&self) -> Scalar {
        self.fill
    }

    pub fn sample(&self, row: Scalar, column: Scalar) -> Scalar {
        let (Some((r0, r1, tr)), Some((c0, c1, tc))) =
            (locate(&self.rows, row), locate(&self.columns, column))
        else {
            return self.fill;
        };

        let at = |r: usize, c: usize| self.values[r * self.columns.len() + c];
        let lower = (1.0 - tc) * at(r0, c0) + tc * at(r0, c1);
        let upper = (1.0 - tc) * at(r1, c0) + tc * at(r1, c1);
        (1.0 - tr) * lower + tr * upper
    }

    /// Pairwise batch lookup of `(rows[i], columns[i])`.
    ///
    /// # Panics
    ///
    /// When the two slices differ in length.
    pub fn sample_many(&self, rows: &[Scalar], columns: &[Scalar]) -> Vec<Scalar> {
        assert_eq!(
            rows.len(),
            columns.len(),
            "batch query needs one column per row coordinate"
        );
        rows.iter()
            .zip(columns)
            .map(|(&row, &column)| self.sample(row, column))
            .collect()
    }

    /// Batch lookup of world points: `y` selects the row, `x` the column
    pub fn sample_points(&self, points: &[Vector]) -> Vec<Scalar> {
        points.iter().map(|point| self.sample(point.y, point.x)).collect()
    }
}

fn is_strictly_ascending(axis: &[Scalar]) -> bool {
    axis.iter().all(|value| value.is_finite()) && axis.windows(2).all(|pair| pair[0] < pair[1])
}

/// Bracketing indices and the fractional position between them
fn locate(axis: &[Scalar], value: Scalar) -> Option<(usize, usize, Scalar)> {
    let (&first, &last) = (axis.first()?, axis.last()?);
    if value.is_nan() || value < first || value > last {
        return None;
    }
    if axis.len() == 1 {
        return Some((0, 0, 0.0));
    }

    let upper = axis.partition_point(|&node| node <= value).clamp(1, axis.len() - 1);
    let lower = upper - 1;
    let t = (value - axis[lower]) / (axis[upper] - axis[lower]);
    Some((lower, upper, t))
}
