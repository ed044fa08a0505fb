//! Physical constants in SI units

use super::math::Scalar;

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²)
pub const GRAVITATIONAL_CONSTANT: Scalar = 6.674_30e-11;

/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: Scalar = 299_792_458.0;

/// Nominal solar mass (kg)
pub const SOLAR_MASS_KG: Scalar = 1.988_47e30;

/// Radius below which a position is treated as sitting on the central mass
pub const DEGENERATE_RADIUS: Scalar = 1e-10;
