use super::interpolator::SurfaceInterpolator;
use super::mesh::{CoordinateMesh, WarpGrid};
use crate::physics::kernel::sanitized_warp_factor;
use crate::physics::math::{Scalar, Vector};
use crate::physics::state::{PhysicalState, Trajectory};

/// The sampled warp factors with both the flat and the sunken mesh
#[derive(Debug, Clone, PartialEq)]
pub struct WarpField {
    pub mesh: CoordinateMesh,
    pub grid: WarpGrid,
    /// Mesh nodes scaled by their warp factor, row-major
    pub warped: Vec<Vector>,
}

impl WarpField {
    pub fn line_count(&self) -> usize {
        self.mesh.line_count()
    }

    pub fn warped_node(&self, row: usize, column: usize) -> Vector {
        self.warped[row * self.line_count() + column]
    }
}

/// A trajectory pushed into the sunken view, with a surface height per point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarpedTrajectory {
    pub points: Vec<Vector>,
    pub heights: Vec<Scalar>,
}

impl WarpedTrajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|point| point.is_finite())
            && self.heights.iter().all(|height| height.is_finite())
    }
}

/// Sample the warp factor on a `line_count × line_count` mesh over `[-r, r]²`
pub fn sample_warp_field(
    physical: &PhysicalState,
    view_radius: Scalar,
    line_count: usize,
) -> WarpField {
    let mesh = CoordinateMesh::new(view_radius, line_count);
    let rs = physical.schwarzschild_radius;

    let values: Vec<Scalar> = mesh
        .nodes()
        .map(|node| sanitized_warp_factor(node, Vector::ZERO, rs))
        .collect();
    let warped = mesh
        .nodes()
        .zip(&values)
        .map(|(node, &warp)| sanitize(node * warp))
        .collect();

    WarpField {
        grid: WarpGrid::new(line_count, values),
        mesh,
        warped,
    }
}

/// Warp every trajectory sample pointwise and look up its height on the surface.
///
/// Heights are queried at the warped positions, matching where the path is drawn.
pub fn warp_trajectory(
    trajectory: &Trajectory,
    physical: &PhysicalState,
    interpolator: &SurfaceInterpolator,
) -> WarpedTrajectory {
    let rs = physical.schwarzschild_radius;
    let points: Vec<Vector> = trajectory
        .positions()
        .map(|position| sanitize(position * sanitized_warp_factor(position, Vector::ZERO, rs)))
        .collect();
    let heights = interpolator.sample_points(&points);

    WarpedTrajectory { points, heights }
}

fn sanitize(point: Vector) -> Vector {
    Vector::new(
        if point.x.is_finite() { point.x } else { 0.0 },
        if point.y.is_finite() { point.y } else { 0.0 },
    )
}
