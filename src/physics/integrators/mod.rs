//! Numerical ODE solvers for the geodesic system
//!
//! Integrators are stateless and object-safe so they can be looked up by name
//! at runtime through the [`registry`]. Each one integrates a four-component
//! state forward in time and reports it at caller-chosen output times.

pub mod dormand_prince;
pub mod registry;
pub mod runge_kutta;

pub use dormand_prince::DormandPrince45;
pub use runge_kutta::RungeKuttaFourthOrder;

use crate::physics::math::Scalar;

pub const STATE_DIMENSION: usize = 4;

/// Flat state layout shared by every solver: `[x, y, vx, vy]`
pub type StateVector = [Scalar; STATE_DIMENSION];

/// Right-hand side `dy/dt = f(t, y)` of an autonomous or time-dependent system
pub trait DerivativeField {
    fn at(&self, t: Scalar, state: &StateVector) -> StateVector;
}

impl<F> DerivativeField for F
where
    F: Fn(Scalar, &StateVector) -> StateVector,
{
    fn at(&self, t: Scalar, state: &StateVector) -> StateVector {
        self(t, state)
    }
}

/// Error control for adaptive solvers and step limits for fixed-step ones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub relative: Scalar,
    pub absolute: Scalar,
    /// Upper bound on a single step; `None` leaves it unbounded
    pub max_step: Option<Scalar>,
    /// Initial step for adaptive solvers; `None` selects one automatically
    pub first_step: Option<Scalar>,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative: 1e-3,
            absolute: 1e-6,
            max_step: None,
            first_step: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub evaluations: usize,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

/// States at each requested output time, plus solver bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub states: Vec<StateVector>,
    pub stats: SolverStats,
}

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    /// Clone this integrator into a new box
    fn clone_box(&self) -> Box<dyn Integrator>;

    /// Integrate `initial` from `output_times[0]` to the last output time.
    ///
    /// The returned solution has exactly one state per output time. The
    /// integrator never fails for a well-formed request: if the state stops
    /// being finite, the last finite state is held for the remaining times.
    ///
    /// Output times may run backward; the solver then integrates toward
    /// decreasing `t`.
    ///
    /// # Panics
    /// If `output_times` is empty, non-finite, or not monotonic.
    fn solve(
        &self,
        field: &dyn DerivativeField,
        initial: StateVector,
        output_times: &[Scalar],
        tolerances: &Tolerances,
    ) -> Solution;

    /// Global order of accuracy
    fn convergence_order(&self) -> usize;

    /// Canonical name used for lookup and configuration
    fn name(&self) -> &'static str;

    /// Alternative names accepted by the registry
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Panics on output times a solver cannot honor
pub(crate) fn validate_output_times(output_times: &[Scalar]) {
    assert!(!output_times.is_empty(), "at least one output time is required");
    assert!(
        output_times.iter().all(|t| t.is_finite()),
        "output times must be finite"
    );
    assert!(
        output_times.windows(2).all(|pair| pair[0] <= pair[1])
            || output_times.windows(2).all(|pair| pair[0] >= pair[1]),
        "output times must be monotonic"
    );
}

/// `1` when integrating toward larger `t`, `-1` toward smaller
pub(crate) fn integration_direction(output_times: &[Scalar]) -> Scalar {
    match (output_times.first(), output_times.last()) {
        (Some(start), Some(end)) if end < start => -1.0,
        _ => 1.0,
    }
}

/// `base + step · Σ weight·k` for each component
pub(crate) fn combine(
    base: &StateVector,
    step: Scalar,
    terms: &[(Scalar, &StateVector)],
) -> StateVector {
    let mut result = *base;
    for (weight, k) in terms {
        if *weight == 0.0 {
            continue;
        }
        for (value, slope) in result.iter_mut().zip(k.iter()) {
            *value += step * weight * slope;
        }
    }
    result
}

pub(crate) fn is_finite_state(state: &StateVector) -> bool {
    state.iter().all(|value| value.is_finite())
}
