//! Centralized event definitions
//!
//! Every input method (keyboard today) translates into a [`SpacetimeCommand`];
//! the plugins react to commands rather than to raw input.

use crate::parameters::SpacetimeParameter;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SpacetimeCommand {
    /// Move a slider-style parameter by a number of notches
    Nudge {
        parameter: SpacetimeParameter,
        steps: i32,
    },
    ToggleGeodesic,
    CycleView,
    /// Restore the parameters the app started with
    Reset,
    TogglePause,
    Quit,
}
