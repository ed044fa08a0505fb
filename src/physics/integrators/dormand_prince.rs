//! Adaptive Dormand–Prince 5(4) integrator with dense output
//!
//! Seven-stage embedded Runge–Kutta pair. The fifth-order solution is
//! propagated, the fourth-order embedded solution provides the error
//! estimate, and the FSAL (first same as last) property makes the seventh
//! stage of one step the first stage of the next.
//!
//! Output times never force the step size: states at requested times are
//! recovered from the free fourth-order interpolant of the step that spans
//! them.

use super::{
    DerivativeField, Integrator, STATE_DIMENSION, Solution, SolverStats, StateVector,
    Tolerances, combine, integration_direction, is_finite_state, validate_output_times,
};
use crate::physics::math::Scalar;
use bevy::log::{debug, warn};

const STAGES: usize = 7;

const C: [Scalar; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[Scalar; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

/// Fifth-order weights
const B: [Scalar; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Difference between the fifth- and fourth-order weights, including the FSAL stage
const E: [Scalar; STAGES] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

/// Dense output coefficients: `y(t + θh) = y + h · Σ_j (Σ_s k_s P[s][j]) θ^(j+1)`
const P: [[Scalar; 4]; STAGES] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

const SAFETY: Scalar = 0.9;
const MIN_FACTOR: Scalar = 0.2;
const MAX_FACTOR: Scalar = 10.0;
/// `-1 / (q + 1)` for the fourth-order error estimator
const ERROR_EXPONENT: Scalar = -1.0 / 5.0;

/// Adaptive explicit Runge–Kutta 5(4) integrator
///
/// Step size is controlled by an RMS norm of the local error scaled by
/// `absolute + relative · max(|y|, |y_new|)`, the same control used by the
/// common RK45 implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrince45;

/// One attempted step from `t` with width `h`
struct Attempt {
    y_new: StateVector,
    stages: [StateVector; STAGES],
    error_norm: Scalar,
}

impl DormandPrince45 {
    fn attempt(
        field: &dyn DerivativeField,
        t: Scalar,
        y: &StateVector,
        f: &StateVector,
        h: Scalar,
        tolerances: &Tolerances,
    ) -> Attempt {
        let mut stages = [[0.0; STATE_DIMENSION]; STAGES];
        stages[0] = *f;

        for s in 1..6 {
            let terms: Vec<(Scalar, &StateVector)> =
                (0..s).map(|j| (A[s][j], &stages[j])).collect();
            let probe = combine(y, h, &terms);
            stages[s] = field.at(t + C[s] * h, &probe);
        }

        let terms: Vec<(Scalar, &StateVector)> =
            (0..6).map(|j| (B[j], &stages[j])).collect();
        let y_new = combine(y, h, &terms);
        stages[6] = field.at(t + h, &y_new);

        let mut sum_of_squares = 0.0;
        for i in 0..STATE_DIMENSION {
            let error: Scalar = h * (0..STAGES).map(|s| E[s] * stages[s][i]).sum::<Scalar>();
            let scale =
                tolerances.absolute + y[i].abs().max(y_new[i].abs()) * tolerances.relative;
            let scaled = error / scale;
            sum_of_squares += scaled * scaled;
        }
        let error_norm = libm::sqrt(sum_of_squares / STATE_DIMENSION as Scalar);

        Attempt {
            y_new,
            stages,
            error_norm,
        }
    }

    /// Evaluate the step's interpolant at `theta ∈ [0, 1]`
    fn interpolate(
        y_old: &StateVector,
        stages: &[StateVector; STAGES],
        h: Scalar,
        theta: Scalar,
    ) -> StateVector {
        let mut result = *y_old;
        for (i, value) in result.iter_mut().enumerate() {
            let mut power = theta;
            let mut increment = 0.0;
            for j in 0..4 {
                let q: Scalar = (0..STAGES).map(|s| stages[s][i] * P[s][j]).sum();
                increment += q * power;
                power *= theta;
            }
            *value += h * increment;
        }
        result
    }

    /// Starting step magnitude from the local scale of the solution and its derivative
    fn initial_step(
        field: &dyn DerivativeField,
        t0: Scalar,
        y0: &StateVector,
        f0: &StateVector,
        interval: Scalar,
        direction: Scalar,
        tolerances: &Tolerances,
        stats: &mut SolverStats,
    ) -> Scalar {
        let scale: Vec<Scalar> = y0
            .iter()
            .map(|y| tolerances.absolute + y.abs() * tolerances.relative)
            .collect();
        let rms = |values: &StateVector| -> Scalar {
            let sum: Scalar = values
                .iter()
                .zip(&scale)
                .map(|(value, s)| (value / s) * (value / s))
                .sum();
            libm::sqrt(sum / STATE_DIMENSION as Scalar)
        };

        let d0 = rms(y0);
        let d1 = rms(f0);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(interval);

        let y1 = combine(y0, direction * h0, &[(1.0, f0)]);
        let f1 = field.at(t0 + direction * h0, &y1);
        stats.evaluations += 1;

        let mut difference = f1;
        for (d, f) in difference.iter_mut().zip(f0.iter()) {
            *d -= f;
        }
        let d2 = rms(&difference) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            libm::pow(0.01 / d1.max(d2), 1.0 / 5.0)
        };

        (100.0 * h0).min(h1).min(interval)
    }
}

impl Integrator for DormandPrince45 {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn solve(
        &self,
        field: &dyn DerivativeField,
        initial: StateVector,
        output_times: &[Scalar],
        tolerances: &Tolerances,
    ) -> Solution {
        validate_output_times(output_times);

        let t0 = output_times[0];
        let t_end = output_times[output_times.len() - 1];
        let direction = integration_direction(output_times);
        let mut stats = SolverStats::default();
        let mut states = Vec::with_capacity(output_times.len());

        // `direction * (a - b) <= 0` reads as "a is not past b"
        let mut next = 0;
        while next < output_times.len() && direction * (output_times[next] - t0) <= 0.0 {
            states.push(initial);
            next += 1;
        }
        if next == output_times.len() {
            return Solution { states, stats };
        }

        let max_step = tolerances.max_step.unwrap_or(Scalar::INFINITY);
        let mut t = t0;
        let mut y = initial;
        let mut f = field.at(t, &y);
        stats.evaluations += 1;

        let first_step = match tolerances.first_step {
            Some(first_step) => first_step.abs(),
            None => {
                let interval = (t_end - t).abs();
                Self::initial_step(field, t, &y, &f, interval, direction, tolerances, &mut stats)
            }
        };
        // Step magnitude; the signed step is `direction * h`
        let mut h = first_step.min(max_step);
        let mut warned_step_floor = false;

        while next < output_times.len() {
            // Smallest step that still moves `t` by a representable amount
            let step_floor = 10.0 * (libm::nextafter(t, direction * Scalar::INFINITY) - t).abs();
            let mut rejected = false;

            let (t_new, attempt) = loop {
                let mut h_try = h.min(max_step).max(step_floor);
                let mut t_new = t + direction * h_try;
                if direction * (t_new - t_end) >= 0.0 {
                    t_new = t_end;
                    h_try = (t_end - t).abs();
                }

                let attempt = Self::attempt(field, t, &y, &f, direction * h_try, tolerances);
                stats.evaluations += 6;

                if attempt.error_norm < 1.0 {
                    let factor = if attempt.error_norm == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * libm::pow(attempt.error_norm, ERROR_EXPONENT)).min(MAX_FACTOR)
                    };
                    h = if rejected {
                        h_try * factor.min(1.0)
                    } else {
                        h_try * factor
                    };
                    stats.accepted_steps += 1;
                    break (t_new, attempt);
                }

                if h_try <= step_floor {
                    if !warned_step_floor {
                        warn!(
                            "Step size collapsed to {h_try:e} at t = {t}; accepting steps without error control"
                        );
                        warned_step_floor = true;
                    }
                    h = h_try;
                    stats.accepted_steps += 1;
                    break (t_new, attempt);
                }

                stats.rejected_steps += 1;
                rejected = true;
                let factor = if attempt.error_norm.is_finite() {
                    (SAFETY * libm::pow(attempt.error_norm, ERROR_EXPONENT)).max(MIN_FACTOR)
                } else {
                    MIN_FACTOR
                };
                h = h_try * factor;
            };

            if !is_finite_state(&attempt.y_new) {
                warn!(
                    "Integration left the finite range at t = {t}; holding the last finite state for {} remaining samples",
                    output_times.len() - next
                );
                states.resize(output_times.len(), y);
                break;
            }

            let h_taken = t_new - t;
            while next < output_times.len() && direction * (output_times[next] - t_new) <= 0.0 {
                let t_out = output_times[next];
                let state = if t_out == t_new {
                    attempt.y_new
                } else {
                    Self::interpolate(&y, &attempt.stages, h_taken, (t_out - t) / h_taken)
                };
                states.push(state);
                next += 1;
            }

            t = t_new;
            y = attempt.y_new;
            f = attempt.stages[6];
        }

        debug!(
            "{}: {} accepted, {} rejected steps, {} evaluations",
            self.name(),
            stats.accepted_steps,
            stats.rejected_steps,
            stats.evaluations
        );

        Solution { states, stats }
    }

    fn convergence_order(&self) -> usize {
        5
    }

    fn name(&self) -> &'static str {
        "rk45"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["dopri5", "dormand_prince"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::math::linspace;

    fn harmonic(_t: Scalar, state: &StateVector) -> StateVector {
        [state[2], state[3], -state[0], -state[1]]
    }

    #[test]
    fn test_tableau_rows_sum_to_nodes() {
        for (row, node) in A.iter().zip(C.iter()) {
            let sum: Scalar = row.iter().sum();
            assert!((sum - node).abs() < 1e-14, "row sum {sum} != node {node}");
        }
        let weights: Scalar = B.iter().sum();
        assert!((weights - 1.0).abs() < 1e-14);
        let error_weights: Scalar = E.iter().sum();
        assert!(error_weights.abs() < 1e-14);
    }

    #[test]
    fn test_dense_output_reaches_step_endpoint() {
        // At θ = 1 the interpolant must collapse to the fifth-order weights
        for (s, row) in P.iter().enumerate() {
            let at_one: Scalar = row.iter().sum();
            let expected = if s < 6 { B[s] } else { 0.0 };
            assert!((at_one - expected).abs() < 1e-12, "stage {s}");
        }
    }

    #[test]
    fn test_constant_velocity_is_exact() {
        let drift = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, 0.0];
        let times = linspace(0.0, 100.0, 11);
        let solution = DormandPrince45.solve(
            &drift,
            [1.0, 2.0, 0.5, -0.25],
            &times,
            &Tolerances::default(),
        );

        assert_eq!(solution.states.len(), 11);
        for (state, t) in solution.states.iter().zip(&times) {
            assert!((state[0] - (1.0 + 0.5 * t)).abs() < 1e-9);
            assert!((state[1] - (2.0 - 0.25 * t)).abs() < 1e-9);
            assert_eq!(state[2], 0.5);
            assert_eq!(state[3], -0.25);
        }
        assert_eq!(solution.stats.rejected_steps, 0);
    }

    #[test]
    fn test_harmonic_oscillator_with_tight_tolerances() {
        let times = linspace(0.0, 2.0 * std::f64::consts::PI, 50);
        let tolerances = Tolerances {
            relative: 1e-10,
            absolute: 1e-12,
            ..Tolerances::default()
        };
        let solution = DormandPrince45.solve(&harmonic, [1.0, 0.0, 0.0, 1.0], &times, &tolerances);

        for (state, t) in solution.states.iter().zip(&times) {
            assert!((state[0] - t.cos()).abs() < 1e-7, "x at t = {t}");
            assert!((state[1] - t.sin()).abs() < 1e-7, "y at t = {t}");
        }
    }

    #[test]
    fn test_backward_integration() {
        let times = linspace(0.0, -2.0 * std::f64::consts::PI, 50);
        let tolerances = Tolerances {
            relative: 1e-10,
            absolute: 1e-12,
            ..Tolerances::default()
        };
        let solution = DormandPrince45.solve(&harmonic, [1.0, 0.0, 0.0, 1.0], &times, &tolerances);

        assert_eq!(solution.states.len(), 50);
        for (state, t) in solution.states.iter().zip(&times) {
            assert!((state[0] - t.cos()).abs() < 1e-7, "x at t = {t}");
            assert!((state[1] - t.sin()).abs() < 1e-7, "y at t = {t}");
        }
        assert!(solution.stats.accepted_steps > 1);
    }

    #[test]
    fn test_backward_max_step() {
        let drift = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, 0.0];
        let tolerances = Tolerances {
            max_step: Some(1.0),
            ..Tolerances::default()
        };
        let solution =
            DormandPrince45.solve(&drift, [0.0, 0.0, 1.0, 0.0], &[0.0, -10.0], &tolerances);
        assert!(solution.stats.accepted_steps >= 10);
        assert!((solution.states[1][0] + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_output_time_returns_initial_state() {
        let initial = [3.0, 4.0, 5.0, 6.0];
        let solution = DormandPrince45.solve(&harmonic, initial, &[2.5], &Tolerances::default());
        assert_eq!(solution.states, vec![initial]);
        assert_eq!(solution.stats.evaluations, 0);
    }

    #[test]
    fn test_max_step_limits_step_count() {
        let drift = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, 0.0];
        let tolerances = Tolerances {
            max_step: Some(1.0),
            ..Tolerances::default()
        };
        let solution =
            DormandPrince45.solve(&drift, [0.0, 0.0, 1.0, 0.0], &[0.0, 10.0], &tolerances);
        assert!(solution.stats.accepted_steps >= 10);
        assert!((solution.states[1][0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_blow_up_holds_last_finite_state() {
        // y' = y² escapes to infinity at t = 1
        let blow_up = |_t: Scalar, state: &StateVector| [state[0] * state[0], 0.0, 0.0, 0.0];
        let times = linspace(0.0, 3.0, 7);
        let solution = DormandPrince45.solve(
            &blow_up,
            [1.0, 0.0, 0.0, 0.0],
            &times,
            &Tolerances::default(),
        );

        assert_eq!(solution.states.len(), times.len());
        assert!(solution.states.iter().all(is_finite_state));
        assert_eq!(solution.states[6], solution.states[5]);
    }
}
