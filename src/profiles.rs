//! Radial time-dilation/redshift profiles and proper-versus-dilated time series

use crate::physics::kernel::{dilation_factor, redshift_factor};
use crate::physics::math::{Scalar, linspace};
use crate::physics::state::PhysicalState;
use std::fmt;

/// Samples used by the radial plots
pub const DEFAULT_PROFILE_SAMPLES: usize = 100;

/// Frames in the proper-versus-dilated time series
pub const DEFAULT_TIME_FRAMES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialSample {
    pub radius: Scalar,
    pub dilation: Scalar,
    pub redshift: Scalar,
}

/// Dilation and redshift factors over `linspace(min_radius, max_radius, samples)`.
///
/// Below the horizon both are `0`; a sample landing exactly on the horizon
/// carries an infinite redshift.
pub fn radial_profile(
    mass_solar: Scalar,
    min_radius: Scalar,
    max_radius: Scalar,
    samples: usize,
) -> Vec<RadialSample> {
    let mass = PhysicalState::from_solar_masses(mass_solar).mass;
    linspace(min_radius, max_radius, samples)
        .into_iter()
        .map(|radius| RadialSample {
            radius,
            dilation: dilation_factor(mass, radius),
            redshift: redshift_factor(mass, radius),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    pub proper_time: Scalar,
    pub radius: Scalar,
    pub dilated_time: Scalar,
}

/// A clock falling from `20·Rs` to just outside the horizon.
///
/// Proper time runs over `[0.1, 20]` while the radius shrinks over
/// `[20·Rs, 1.001·Rs]`; the dilated time is `τ / sqrt(1 − Rs/r)`.
pub fn time_comparison(mass_solar: Scalar, frames: usize) -> Vec<TimeSample> {
    let rs = PhysicalState::from_solar_masses(mass_solar).schwarzschild_radius;
    let proper_times = linspace(0.1, 20.0, frames);
    let radii = linspace(20.0 * rs, 1.001 * rs, frames);

    proper_times
        .into_iter()
        .zip(radii)
        .map(|(proper_time, radius)| TimeSample {
            proper_time,
            radius,
            dilated_time: proper_time / libm::sqrt(1.0 - rs / radius),
        })
        .collect()
}

/// Plain-text tables for `--profiles`
pub struct ProfileReport<'a> {
    pub name: &'a str,
    pub mass_solar: Scalar,
    pub radial: &'a [RadialSample],
    pub times: &'a [TimeSample],
}

impl fmt::Display for ProfileReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} solar masses)", self.name, self.mass_solar)?;
        writeln!(f)?;
        writeln!(f, "{:>16} {:>12} {:>14}", "radius (m)", "dilation", "redshift")?;
        for sample in self.radial {
            writeln!(
                f,
                "{:>16.3} {:>12.6} {:>14.6}",
                sample.radius, sample.dilation, sample.redshift
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>12} {:>16} {:>14}", "proper (s)", "radius (m)", "dilated (s)")?;
        for sample in self.times {
            writeln!(
                f,
                "{:>12.4} {:>16.3} {:>14.4}",
                sample.proper_time, sample.radius, sample.dilated_time
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_profile_shape() {
        let profile = radial_profile(10.0, 0.0, 100_000.0, DEFAULT_PROFILE_SAMPLES);
        assert_eq!(profile.len(), 100);
        assert_eq!(profile[0].radius, 0.0);
        assert_eq!(profile[99].radius, 100_000.0);
    }

    #[test]
    fn test_radial_profile_horizon_behavior() {
        let rs = PhysicalState::from_solar_masses(10.0).schwarzschild_radius;
        let profile = radial_profile(10.0, 0.0, 10.0 * rs, 101);

        for sample in &profile {
            if sample.radius < rs {
                assert_eq!(sample.dilation, 0.0);
                assert_eq!(sample.redshift, 0.0);
            } else if sample.radius > 1.01 * rs {
                assert!((0.0..=1.0).contains(&sample.dilation));
                assert!((sample.redshift * sample.dilation - 1.0).abs() < 1e-12);
            }
        }
        let outer = profile.last().unwrap();
        assert!(outer.dilation > profile[50].dilation);
    }

    #[test]
    fn test_time_comparison() {
        let rs = PhysicalState::from_solar_masses(5.0).schwarzschild_radius;
        let series = time_comparison(5.0, DEFAULT_TIME_FRAMES);

        assert_eq!(series.len(), 200);
        assert_eq!(series[0].proper_time, 0.1);
        assert_eq!(series[199].proper_time, 20.0);
        assert!((series[0].radius - 20.0 * rs).abs() < 1e-6);
        assert!((series[199].radius - 1.001 * rs).abs() < 1e-6);
        assert!(series.iter().all(|s| s.dilated_time.is_finite()));
        assert!(series.iter().all(|s| s.dilated_time >= s.proper_time));
        // Near the horizon the dilated clock runs ~31.6 times slower
        assert!(series[199].dilated_time > 30.0 * series[199].proper_time);
    }

    #[test]
    fn test_report_lists_every_row() {
        let radial = radial_profile(1.0, 0.0, 10_000.0, 3);
        let times = time_comparison(1.0, 2);
        let report = ProfileReport {
            name: "Sun",
            mass_solar: 1.0,
            radial: &radial,
            times: &times,
        }
        .to_string();

        assert!(report.starts_with("Sun (1 solar masses)"));
        assert_eq!(report.lines().count(), 1 + 1 + 1 + 3 + 1 + 1 + 2);
    }
}
