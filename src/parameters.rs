//! Slider-style parameters adjustable while the app runs
//!
//! Each parameter has a closed range derived from the launch configuration;
//! nudging moves it by a fixed fraction of that range and yields a fresh
//! [`SpacetimeConfig`] instead of editing the current one.

use crate::config::SpacetimeConfig;
use crate::physics::math::Scalar;

/// Notches across each parameter's full range
pub const SLIDER_STEPS: Scalar = 100.0;

/// Extra room on top of the initial view radius
pub const VIEW_RADIUS_HEADROOM: Scalar = 500_000.0;

/// Smallest view radius the controls will produce
pub const MIN_VIEW_RADIUS: Scalar = 1.0;

pub const MAX_SPEED: Scalar = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpacetimeParameter {
    ViewRadius,
    X0,
    Y0,
    VX0,
    VY0,
}

impl SpacetimeParameter {
    pub const ALL: [SpacetimeParameter; 5] = [
        SpacetimeParameter::ViewRadius,
        SpacetimeParameter::X0,
        SpacetimeParameter::Y0,
        SpacetimeParameter::VX0,
        SpacetimeParameter::VY0,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpacetimeParameter::ViewRadius => "Radius",
            SpacetimeParameter::X0 => "x0",
            SpacetimeParameter::Y0 => "y0",
            SpacetimeParameter::VX0 => "vx",
            SpacetimeParameter::VY0 => "vy",
        }
    }

    /// Closed `(min, max)` range, fixed by the launch configuration
    pub fn range(self, initial: &SpacetimeConfig) -> (Scalar, Scalar) {
        match self {
            SpacetimeParameter::ViewRadius => {
                (MIN_VIEW_RADIUS, initial.view_radius + VIEW_RADIUS_HEADROOM)
            }
            SpacetimeParameter::X0 | SpacetimeParameter::Y0 => (0.0, initial.view_radius),
            SpacetimeParameter::VX0 | SpacetimeParameter::VY0 => (-MAX_SPEED, MAX_SPEED),
        }
    }

    pub fn step(self, initial: &SpacetimeConfig) -> Scalar {
        let (min, max) = self.range(initial);
        (max - min) / SLIDER_STEPS
    }

    pub fn value(self, config: &SpacetimeConfig) -> Scalar {
        match self {
            SpacetimeParameter::ViewRadius => config.view_radius,
            SpacetimeParameter::X0 => config.x0,
            SpacetimeParameter::Y0 => config.y0,
            SpacetimeParameter::VX0 => config.v_x0,
            SpacetimeParameter::VY0 => config.v_y0,
        }
    }

    /// A copy of `config` with this parameter set to `value`, clamped to its range
    pub fn with_value(
        self,
        config: &SpacetimeConfig,
        initial: &SpacetimeConfig,
        value: Scalar,
    ) -> SpacetimeConfig {
        let (min, max) = self.range(initial);
        let value = if max >= min { value.clamp(min, max) } else { min };
        match self {
            SpacetimeParameter::ViewRadius => config.with_view_radius(value),
            SpacetimeParameter::X0 => config.with_initial_position(value, config.y0),
            SpacetimeParameter::Y0 => config.with_initial_position(config.x0, value),
            SpacetimeParameter::VX0 => config.with_initial_velocity(value, config.v_y0),
            SpacetimeParameter::VY0 => config.with_initial_velocity(config.v_x0, value),
        }
    }

    pub fn nudged(
        self,
        config: &SpacetimeConfig,
        initial: &SpacetimeConfig,
        steps: i32,
    ) -> SpacetimeConfig {
        let value = self.value(config) + Scalar::from(steps) * self.step(initial);
        self.with_value(config, initial, value)
    }
}
