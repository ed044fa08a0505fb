//! Warp field sampling and surface interpolation
//!
//! Turns a [`PhysicalState`](crate::physics::state::PhysicalState) into a grid
//! of warp factors, and maps integrated trajectories onto that surface.

pub mod interpolator;
pub mod mesh;
pub mod sampler;
pub mod snapshot;

pub use interpolator::SurfaceInterpolator;
pub use mesh::{CoordinateMesh, WarpGrid};
pub use sampler::{WarpField, WarpedTrajectory, sample_warp_field, warp_trajectory};
pub use snapshot::{SpacetimeSnapshot, compute_snapshot};
