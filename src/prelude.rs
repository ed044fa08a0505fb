//! Spacewarp prelude module
//!
//! Re-exports the types most plugins and systems need, to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Physics
pub use crate::physics::math::{Scalar, Vector};

// Internal re-exports - Config
pub use crate::config::{RenderingConfig, SolverConfig, SpacetimeConfig, VisualizerConfig};

// Internal re-exports - States, events, resources
pub use crate::events::SpacetimeCommand;
pub use crate::parameters::SpacetimeParameter;
pub use crate::resources::{CurrentSnapshot, InitialSpacetime, PlaybackCursor, ViewMode};
pub use crate::states::AppState;
