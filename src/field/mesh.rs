use crate::physics::math::{Scalar, Vector, linspace};

/// Square mesh over `[-radius, radius]²`.
///
/// Both axes share the same ascending samples. Rows follow `y`, columns
/// follow `x`, so node `(row, column)` sits at `(axis[column], axis[row])`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMesh {
    axis: Vec<Scalar>,
}

impl CoordinateMesh {
    pub fn new(radius: Scalar, line_count: usize) -> Self {
        Self {
            axis: linspace(-radius, radius, line_count),
        }
    }

    pub fn line_count(&self) -> usize {
        self.axis.len()
    }

    /// Column coordinates (`x`)
    pub fn columns(&self) -> &[Scalar] {
        &self.axis
    }

    /// Row coordinates (`y`)
    pub fn rows(&self) -> &[Scalar] {
        &self.axis
    }

    pub fn node(&self, row: usize, column: usize) -> Vector {
        Vector::new(self.axis[column], self.axis[row])
    }

    /// Nodes in row-major order
    pub fn nodes(&self) -> impl Iterator<Item = Vector> + '_ {
        self.axis
            .iter()
            .flat_map(move |&y| self.axis.iter().map(move |&x| Vector::new(x, y)))
    }
}

/// Row-major warp factors over a [`CoordinateMesh`], invalid entries already zeroed
#[derive(Debug, Clone, PartialEq)]
pub struct WarpGrid {
    line_count: usize,
    values: Vec<Scalar>,
}

impl WarpGrid {
    /// # Panics
    ///
    /// When `values` does not hold exactly `line_count²` entries.
    pub fn new(line_count: usize, values: Vec<Scalar>) -> Self {
        assert_eq!(
            values.len(),
            line_count * line_count,
            "warp grid must be line_count × line_count"
        );
        Self { line_count, values }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.line_count, self.line_count)
    }

    pub fn get(&self, row: usize, column: usize) -> Scalar {
        self.values[row * self.line_count + column]
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Scalar]> {
        self.values.chunks(self.line_count.max(1))
    }
}
