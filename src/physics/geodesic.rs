//! Geodesic integration for a test particle near the mass

use super::integrators::{DerivativeField, Integrator, StateVector, Tolerances};
use super::kernel::geodesic_derivative;
use super::math::{Scalar, linspace};
use super::state::{GeodesicState, Trajectory};
use bevy::log::{debug, warn};

/// The geodesic equation as an ODE right-hand side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicSystem {
    /// Mass in geometric units (`G·M/c²`, meters)
    pub mass: Scalar,
    pub kappa: Scalar,
}

impl DerivativeField for GeodesicSystem {
    fn at(&self, _t: Scalar, state: &StateVector) -> StateVector {
        geodesic_derivative(&GeodesicState::from(*state), self.mass, self.kappa).into()
    }
}

/// Everything needed to integrate one trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicRequest {
    pub initial: GeodesicState,
    /// Mass in geometric units (`G·M/c²`, meters)
    pub mass_geometric: Scalar,
    pub kappa: Scalar,
    /// Number of steps `N`; the trajectory has `N + 1` samples
    pub samples: usize,
    /// Time between samples
    pub delta: Scalar,
}

impl GeodesicRequest {
    /// Output times `0, Δ, 2Δ, …, N·Δ`, descending when `Δ < 0`
    pub fn output_times(&self) -> Vec<Scalar> {
        linspace(0.0, self.duration(), self.samples + 1)
    }

    /// Signed span `N·Δ` of the integration
    pub fn duration(&self) -> Scalar {
        self.samples as Scalar * self.delta
    }
}

/// Integrate the particle over `[0, N·Δ]`, sampled at `N + 1` equally spaced times.
///
/// A negative `Δ` integrates backward in time. A particle that starts on the
/// mass (or reaches it) stops moving, since the derivative is zero there;
/// integration itself never fails. A non-finite span holds the initial state
/// at `t = 0` for every sample.
pub fn integrate_geodesic(
    integrator: &dyn Integrator,
    request: &GeodesicRequest,
    tolerances: &Tolerances,
) -> Trajectory {
    let count = request.samples + 1;
    if !request.duration().is_finite() {
        warn!(
            "Geodesic span {} × {} is not finite; holding the initial state",
            request.samples, request.delta
        );
        return Trajectory::new(vec![0.0; count], vec![request.initial; count]);
    }

    let system = GeodesicSystem {
        mass: request.mass_geometric,
        kappa: request.kappa,
    };
    let times = request.output_times();
    let solution = integrator.solve(&system, request.initial.into(), &times, tolerances);

    debug!(
        "Integrated {} geodesic samples with {} ({} evaluations)",
        times.len(),
        integrator.name(),
        solution.stats.evaluations
    );

    let states = solution.states.into_iter().map(GeodesicState::from).collect();
    Trajectory::new(times, states)
}
