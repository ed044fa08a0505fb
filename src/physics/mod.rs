//! Physics for the Schwarzschild visualizer
//!
//! Pure kernel functions, the geodesic state types, and the numerical
//! integrators that evolve a test particle around the mass.

pub mod constants;
pub mod geodesic;
pub mod integrators;
pub mod kernel;
pub mod math;
pub mod resources;
pub mod state;
