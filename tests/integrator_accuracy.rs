//! Accuracy tests for numerical integrators
//!
//! Tests each integrator against known analytical solutions, and checks that
//! the geodesic system conserves what its equations say it must.

use spacewarp::integrators::{
    DormandPrince45, Integrator, RungeKuttaFourthOrder, StateVector, Tolerances,
};
use spacewarp::physics::geodesic::{GeodesicRequest, integrate_geodesic};
use spacewarp::physics::math::{Scalar, Vector, linspace};
use spacewarp::physics::state::GeodesicState;

const TAU: Scalar = std::f64::consts::TAU;

/// Simple harmonic oscillator along x: a = -ω²x
///
/// With x(0) = A, v(0) = 0: x(t) = A·cos(ωt), v(t) = -A·ω·sin(ωt)
struct HarmonicOscillator {
    omega: Scalar,
    amplitude: Scalar,
}

impl HarmonicOscillator {
    fn initial(&self) -> StateVector {
        [self.amplitude, 0.0, 0.0, 0.0]
    }

    fn derivative(&self) -> impl Fn(Scalar, &StateVector) -> StateVector + '_ {
        move |_, y| [y[2], y[3], -self.omega * self.omega * y[0], 0.0]
    }

    fn exact(&self, t: Scalar) -> (Scalar, Scalar) {
        (
            self.amplitude * (self.omega * t).cos(),
            -self.amplitude * self.omega * (self.omega * t).sin(),
        )
    }

    /// Largest position or velocity error over the output times
    fn max_error(
        &self,
        integrator: &dyn Integrator,
        times: &[Scalar],
        tolerances: &Tolerances,
    ) -> Scalar {
        let solution = integrator.solve(&self.derivative(), self.initial(), times, tolerances);
        times
            .iter()
            .zip(&solution.states)
            .map(|(&t, state)| {
                let (x, v) = self.exact(t);
                (state[0] - x).abs().max((state[2] - v).abs())
            })
            .fold(0.0, Scalar::max)
    }
}

const OSCILLATOR: HarmonicOscillator = HarmonicOscillator {
    omega: 1.0,
    amplitude: 1.0,
};

fn tight() -> Tolerances {
    Tolerances {
        relative: 1e-10,
        absolute: 1e-12,
        ..Tolerances::default()
    }
}

#[test]
fn test_dormand_prince_default_tolerance_tracks_oscillator() {
    let times = linspace(0.0, TAU, 21);
    let error = OSCILLATOR.max_error(&DormandPrince45, &times, &Tolerances::default());
    assert!(error < 1e-2, "error {error}");
}

#[test]
fn test_dormand_prince_tight_tolerance_tracks_oscillator() {
    let times = linspace(0.0, 3.0 * TAU, 61);
    let error = OSCILLATOR.max_error(&DormandPrince45, &times, &tight());
    assert!(error < 1e-7, "error {error}");
}

#[test]
fn test_tighter_tolerance_costs_more_evaluations() {
    let times = linspace(0.0, TAU, 11);
    let loose = DormandPrince45.solve(
        &OSCILLATOR.derivative(),
        OSCILLATOR.initial(),
        &times,
        &Tolerances::default(),
    );
    let strict = DormandPrince45.solve(
        &OSCILLATOR.derivative(),
        OSCILLATOR.initial(),
        &times,
        &tight(),
    );

    assert!(strict.stats.evaluations > loose.stats.evaluations);
    assert!(strict.stats.accepted_steps > loose.stats.accepted_steps);
}

#[test]
fn test_rk4_small_steps_track_oscillator() {
    let times = linspace(0.0, TAU, 11);
    let tolerances = Tolerances {
        max_step: Some(0.01),
        ..Tolerances::default()
    };
    let error = OSCILLATOR.max_error(&RungeKuttaFourthOrder, &times, &tolerances);
    assert!(error < 1e-7, "error {error}");
}

#[test]
fn test_rk4_convergence_order() {
    let times = [0.0, TAU];
    let error_at = |step: Scalar| {
        let tolerances = Tolerances {
            max_step: Some(step),
            ..Tolerances::default()
        };
        OSCILLATOR.max_error(&RungeKuttaFourthOrder, &times, &tolerances)
    };

    let ratio = error_at(0.1) / error_at(0.05);
    let order = ratio.log2();
    assert!(
        (order - RungeKuttaFourthOrder.convergence_order() as Scalar).abs() < 0.5,
        "observed order {order}"
    );
}

#[test]
fn test_circular_kepler_orbit_keeps_its_radius() {
    // Unit circular orbit with μ = 1 has period 2π
    let kepler = |_: Scalar, y: &StateVector| {
        let r3 = (y[0] * y[0] + y[1] * y[1]).powf(1.5);
        [y[2], y[3], -y[0] / r3, -y[1] / r3]
    };
    let times = linspace(0.0, TAU, 101);
    let solution = DormandPrince45.solve(&kepler, [1.0, 0.0, 0.0, 1.0], &times, &tight());

    for state in &solution.states {
        let radius = (state[0] * state[0] + state[1] * state[1]).sqrt();
        assert!((radius - 1.0).abs() < 1e-7, "radius {radius}");
    }
    let last = solution.states.last().unwrap();
    assert!((last[0] - 1.0).abs() < 1e-6 && last[1].abs() < 1e-6);
}

#[test]
fn test_geodesic_conserves_angular_momentum() {
    // The acceleration acts along the position vector; this orbit stays beyond 60 km
    let request = GeodesicRequest {
        initial: GeodesicState::new(Vector::new(50_000.0, 50_000.0), Vector::new(-0.1, 0.05)),
        mass_geometric: 14_766.0,
        kappa: 0.0,
        samples: 500,
        delta: 2000.0,
    };
    let angular_momentum = |state: &GeodesicState| state.position.perp_dot(state.velocity);
    let initial = angular_momentum(&request.initial);

    for integrator in [
        Box::new(DormandPrince45) as Box<dyn Integrator>,
        Box::new(RungeKuttaFourthOrder),
    ] {
        let tolerances = Tolerances {
            max_step: Some(100.0),
            ..tight()
        };
        let trajectory = integrate_geodesic(integrator.as_ref(), &request, &tolerances);
        for state in trajectory.states() {
            let drift = (angular_momentum(state) - initial).abs() / initial.abs();
            assert!(drift < 1e-6, "{} drift {drift}", integrator.name());
        }
    }
}
