//! Closed-form Schwarzschild relations and the geodesic right-hand side
//!
//! Every function here is pure. Physical edge cases (sub-horizon radii, a
//! particle sitting on the mass) produce a defined sentinel instead of an error
//! so the visualization always has something to draw.

use super::constants::{
    DEGENERATE_RADIUS, GRAVITATIONAL_CONSTANT, SOLAR_MASS_KG, SPEED_OF_LIGHT,
};
use super::math::{Scalar, Vector};
use super::state::GeodesicState;

pub fn solar_mass_to_kg(solar_masses: Scalar) -> Scalar {
    solar_masses * SOLAR_MASS_KG
}

/// Mass expressed as a length, `G·M/c²`
pub fn kg_to_geometric_mass(mass_kg: Scalar) -> Scalar {
    GRAVITATIONAL_CONSTANT * mass_kg / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)
}

/// Event horizon radius `2·G·M/c²` in meters
pub fn schwarzschild_radius(mass_kg: Scalar) -> Scalar {
    2.0 * GRAVITATIONAL_CONSTANT * mass_kg / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)
}

pub fn coordinate_radius(x: Scalar, y: Scalar) -> Scalar {
    libm::hypot(x, y)
}

/// Ratio of proper time to coordinate time at `radius`.
///
/// Inside the horizon this reports `0` rather than a complex value.
pub fn dilation_factor(mass_kg: Scalar, radius: Scalar) -> Scalar {
    let horizon = schwarzschild_radius(mass_kg);
    if radius < horizon {
        return 0.0;
    }
    libm::sqrt(1.0 - horizon / radius)
}

/// Gravitational redshift `1 + z` for light emitted at `radius`.
///
/// Inside the horizon this reports `0`, which is deliberately *not* the
/// reciprocal of [`dilation_factor`]. Exactly on the horizon the reciprocal of
/// zero is returned unguarded, giving `+∞`.
pub fn redshift_factor(mass_kg: Scalar, radius: Scalar) -> Scalar {
    let horizon = schwarzschild_radius(mass_kg);
    if radius < horizon {
        return 0.0;
    }
    1.0 / libm::sqrt(1.0 - horizon / radius)
}

/// Elapsed proper time for a clock at `radius` while `coordinate_time` passes far away
pub fn proper_time(coordinate_time: Scalar, mass_kg: Scalar, radius: Scalar) -> Scalar {
    coordinate_time * dilation_factor(mass_kg, radius)
}

/// Wavelength seen at infinity for light emitted with `emitted` at `radius`
pub fn redshifted_wavelength(emitted: Scalar, mass_kg: Scalar, radius: Scalar) -> Scalar {
    emitted * redshift_factor(mass_kg, radius)
}

/// Factor used to sink the flat grid toward the mass.
///
/// Returns `None` where the factor is undefined: on the center itself, inside
/// the horizon, or whenever the arithmetic would not produce a finite value.
pub fn warp_factor(
    point: Vector,
    center: Vector,
    schwarzschild_radius: Scalar,
) -> Option<Scalar> {
    let radius = point.distance(center);
    if radius == 0.0 || radius < schwarzschild_radius {
        return None;
    }

    let factor = libm::sqrt(1.0 - schwarzschild_radius / radius);
    factor.is_finite().then_some(factor)
}

/// [`warp_factor`] with the invalid region flattened to `0`
pub fn sanitized_warp_factor(
    point: Vector,
    center: Vector,
    schwarzschild_radius: Scalar,
) -> Scalar {
    warp_factor(point, center, schwarzschild_radius).unwrap_or(0.0)
}

/// Angular velocity `(x·vy − y·vx) / r²` of a state about the origin
pub fn angular_velocity(state: &GeodesicState) -> Scalar {
    let radius = state.radius();
    if radius < DEGENERATE_RADIUS {
        return 0.0;
    }
    state.position.perp_dot(state.velocity) / (radius * radius)
}

/// Time derivative of a geodesic state.
///
/// This is a reduced planar analogue of the radial geodesic equation: a
/// `kappa`-weighted inverse-square term plus a centrifugal correction
/// proportional to `3·m·ω²/r`. Both terms act along the position vector.
///
/// A state closer to the origin than [`DEGENERATE_RADIUS`] has a zero
/// derivative, so integration through the center stalls instead of dividing
/// by zero.
pub fn geodesic_derivative(state: &GeodesicState, mass: Scalar, kappa: Scalar) -> GeodesicState {
    let radius = state.radius();
    if radius < DEGENERATE_RADIUS {
        return GeodesicState::ZERO;
    }

    let omega = angular_velocity(state);
    let coefficient = mass * kappa / (radius * radius) - 3.0 * mass * omega * omega / radius;

    GeodesicState {
        position: state.velocity,
        velocity: state.position * coefficient,
    }
}
