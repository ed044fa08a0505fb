//! Spacewarp library
//!
//! Schwarzschild black hole physics, geodesic integration, and the warp-field
//! pipeline, plus the Bevy plugins that render them. Exposed as a library to
//! enable integration testing and benchmarks.

pub mod cli;
pub mod config;
pub mod events;
pub mod field;
pub mod parameters;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod profiles;
pub mod resources;
pub mod states;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used items
pub use config::{ConfigError, VisualizerConfig};
pub use field::{SpacetimeSnapshot, compute_snapshot};
pub use physics::{
    integrators,
    math::{Scalar, Vector},
};
pub use plugins::{
    camera::CameraPlugin, controls::ControlsPlugin, hud::HudPlugin, spacetime::SpacetimePlugin,
    visualization::VisualizationPlugin,
};
pub use states::AppState;
