//! Fixed-step Runge-Kutta integration

use super::{
    DerivativeField, Integrator, Solution, SolverStats, StateVector, Tolerances, combine,
    is_finite_state, validate_output_times,
};
use crate::physics::math::Scalar;
use bevy::log::warn;

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// A classic multi-stage integrator that provides fourth-order accuracy
/// by combining four intermediate evaluations of the derivative.
///
/// The RK4 algorithm:
/// 1. k1 = f(t, y)
/// 2. k2 = f(t + dt/2, y + k1*dt/2)
/// 3. k3 = f(t + dt/2, y + k2*dt/2)
/// 4. k4 = f(t + dt, y + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// Steps land exactly on every output time, in whichever direction the
/// times run. When `max_step` is set, each interval between output times is
/// split into equal sub-steps no wider than it. Tolerances are otherwise
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl RungeKuttaFourthOrder {
    fn step(
        field: &dyn DerivativeField,
        t: Scalar,
        y: &StateVector,
        dt: Scalar,
    ) -> StateVector {
        let k1 = field.at(t, y);
        let k2 = field.at(t + dt * 0.5, &combine(y, dt * 0.5, &[(1.0, &k1)]));
        let k3 = field.at(t + dt * 0.5, &combine(y, dt * 0.5, &[(1.0, &k2)]));
        let k4 = field.at(t + dt, &combine(y, dt, &[(1.0, &k3)]));

        combine(
            y,
            dt / 6.0,
            &[(1.0, &k1), (2.0, &k2), (2.0, &k3), (1.0, &k4)],
        )
    }
}

impl Integrator for RungeKuttaFourthOrder {
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

        let mut stats = SolverStats::default();
        let mut states = Vec::with_capacity(output_times.len());
        let mut y = initial;
        states.push(y);

        for (index, interval) in output_times.windows(2).enumerate() {
            let (t_start, t_stop) = (interval[0], interval[1]);
            let span = t_stop - t_start;
            let substeps = match tolerances.max_step {
                Some(max_step) if max_step > 0.0 && span != 0.0 => {
                    libm::ceil(span.abs() / max_step).max(1.0) as usize
                }
                _ => 1,
            };
            let dt = span / substeps as Scalar;

            let mut next = y;
            for substep in 0..substeps {
                if dt == 0.0 {
                    break;
                }
                next = Self::step(field, t_start + dt * substep as Scalar, &next, dt);
                stats.evaluations += 4;
                stats.accepted_steps += 1;
            }

            if !is_finite_state(&next) {
                warn!(
                    "Integration left the finite range at t = {t_start}; holding the last finite state for {} remaining samples",
                    output_times.len() - index - 1
                );
                states.resize(output_times.len(), y);
                break;
            }

            y = next;
            states.push(y);
        }

        Solution { states, stats }
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "rk4"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["runge_kutta_fourth_order"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_constant_acceleration() {
        let falling = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, -9.81];
        let solution = RungeKuttaFourthOrder.solve(
            &falling,
            [1.0, 0.0, 0.0, 1.0],
            &[0.0, 0.01],
            &Tolerances::default(),
        );

        // Exact for a quadratic trajectory
        let last = solution.states[1];
        assert!((last[1] - (0.01 - 0.5 * 9.81 * 0.0001)).abs() < 1e-12);
        assert!((last[3] - (1.0 - 0.0981)).abs() < 1e-12);
        assert_eq!(last[0], 1.0);
        assert_eq!(solution.stats.evaluations, 4);
    }

    #[test]
    fn test_rk4_substeps_follow_max_step() {
        let drift = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, 0.0];
        let tolerances = Tolerances {
            max_step: Some(0.3),
            ..Tolerances::default()
        };
        let initial = [0.0, 0.0, 2.0, 0.0];
        let solution = RungeKuttaFourthOrder.solve(&drift, initial, &[0.0, 1.0, 2.0], &tolerances);

        // ceil(1.0 / 0.3) = 4 sub-steps per interval
        assert_eq!(solution.stats.accepted_steps, 8);
        assert!((solution.states[2][0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_backward_substeps() {
        let drift = |_t: Scalar, state: &StateVector| [state[2], state[3], 0.0, 0.0];
        let tolerances = Tolerances {
            max_step: Some(0.3),
            ..Tolerances::default()
        };
        let initial = [0.0, 0.0, 2.0, 0.0];
        let solution =
            RungeKuttaFourthOrder.solve(&drift, initial, &[0.0, -1.0, -2.0], &tolerances);

        assert_eq!(solution.stats.accepted_steps, 8);
        assert!((solution.states[1][0] + 2.0).abs() < 1e-12);
        assert!((solution.states[2][0] + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_convergence_order() {
        let oscillator =
            |_t: Scalar, state: &StateVector| [state[2], state[3], -state[0], -state[1]];
        let error_with = |max_step: Scalar| {
            let tolerances = Tolerances {
                max_step: Some(max_step),
                ..Tolerances::default()
            };
            let initial = [1.0, 0.0, 0.0, 0.0];
            let solution =
                RungeKuttaFourthOrder.solve(&oscillator, initial, &[0.0, 2.0], &tolerances);
            (solution.states[1][0] - 2.0_f64.cos()).abs()
        };

        let coarse = error_with(0.1);
        let fine = error_with(0.05);
        let ratio = coarse / fine;
        // Halving the step should shrink the error by about 2^4
        assert!((12.0..20.0).contains(&ratio), "ratio {ratio}");
    }
}
