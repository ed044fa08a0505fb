//! Value types that flow through a recomputation

use super::integrators::StateVector;
use super::kernel::{kg_to_geometric_mass, schwarzschild_radius, solar_mass_to_kg};
use super::math::{Scalar, Vector};

/// Mass of the black hole and its horizon, fixed for one recomputation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalState {
    /// Mass in kilograms
    pub mass: Scalar,
    /// Event horizon radius in meters
    pub schwarzschild_radius: Scalar,
}

impl PhysicalState {
    pub fn from_kg(mass: Scalar) -> Self {
        Self {
            mass,
            schwarzschild_radius: schwarzschild_radius(mass),
        }
    }

    pub fn from_solar_masses(solar_masses: Scalar) -> Self {
        Self::from_kg(solar_mass_to_kg(solar_masses))
    }

    /// Mass as a length (`G·M/c²`), the form the geodesic equation expects
    #[inline]
    pub fn geometric_mass(&self) -> Scalar {
        kg_to_geometric_mass(self.mass)
    }
}

/// Position and velocity of the test particle in the orbital plane.
///
/// The same shape doubles as the state's time derivative, where `position`
/// holds the velocity and `velocity` holds the acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeodesicState {
    pub position: Vector,
    pub velocity: Vector,
}

impl GeodesicState {
    pub const ZERO: Self = Self {
        position: Vector::ZERO,
        velocity: Vector::ZERO,
    };

    pub fn new(position: Vector, velocity: Vector) -> Self {
        Self { position, velocity }
    }

    #[inline]
    pub fn radius(&self) -> Scalar {
        self.position.length()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

impl From<StateVector> for GeodesicState {
    fn from([x, y, vx, vy]: StateVector) -> Self {
        Self::new(Vector::new(x, y), Vector::new(vx, vy))
    }
}

impl From<GeodesicState> for StateVector {
    fn from(state: GeodesicState) -> Self {
        [
            state.position.x,
            state.position.y,
            state.velocity.x,
            state.velocity.y,
        ]
    }
}

/// Particle states sampled at fixed output times
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<Scalar>,
    states: Vec<GeodesicState>,
}

impl Trajectory {
    /// Pairs output times with their states.
    ///
    /// # Panics
    /// If the two sequences differ in length.
    pub fn new(times: Vec<Scalar>, states: Vec<GeodesicState>) -> Self {
        assert_eq!(
            times.len(),
            states.len(),
            "trajectory needs one state per output time"
        );
        Self { times, states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn times(&self) -> &[Scalar] {
        &self.times
    }

    pub fn states(&self) -> &[GeodesicState] {
        &self.states
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.states.iter().map(|state| state.position)
    }

    pub fn first(&self) -> Option<&GeodesicState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&GeodesicState> {
        self.states.last()
    }
}
