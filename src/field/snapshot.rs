//! One full recomputation of everything the views draw

use super::interpolator::SurfaceInterpolator;
use super::sampler::{WarpField, WarpedTrajectory, sample_warp_field, warp_trajectory};
use crate::config::{SolverConfig, SpacetimeConfig};
use crate::physics::geodesic::{GeodesicRequest, integrate_geodesic};
use crate::physics::integrators::Integrator;
use crate::physics::state::{PhysicalState, Trajectory};
use bevy::log::{debug, info, warn};
use std::time::Instant;

/// An integrated geodesic and its image on the warped surface
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicPath {
    pub trajectory: Trajectory,
    pub warped: WarpedTrajectory,
    /// Surface the warped heights were looked up on
    pub surface: SurfaceInterpolator,
}

/// Immutable result of one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SpacetimeSnapshot {
    pub physical: PhysicalState,
    pub field: WarpField,
    /// Absent when geodesic plotting is disabled
    pub geodesic: Option<GeodesicPath>,
}

/// Number of integration steps after applying the optional cap
pub fn capped_samples(requested: usize, cap: Option<usize>) -> usize {
    match cap {
        Some(cap) if requested > cap => {
            warn!("Clamping geodesic samples from {requested} to {cap}");
            cap
        }
        _ => requested,
    }
}

/// Sample the field and, if enabled, integrate and warp the geodesic.
///
/// Runs to completion on the calling thread. The surface interpolant is only
/// built for the geodesic, so a field-only snapshot accepts any view radius.
///
/// # Panics
///
/// With `plot_geodesic` set and a view radius that is not positive, since the
/// mesh axes are then not strictly ascending.
pub fn compute_snapshot(
    spacetime: &SpacetimeConfig,
    solver: &SolverConfig,
    integrator: &dyn Integrator,
) -> SpacetimeSnapshot {
    let started = Instant::now();
    let physical = spacetime.physical_state();

    let field = sample_warp_field(&physical, spacetime.view_radius, spacetime.grid_count);
    debug!(
        "Sampled {0}x{0} warp field in {1:?}",
        spacetime.grid_count,
        started.elapsed()
    );

    let geodesic = spacetime.plot_geodesic.then(|| {
        let request = GeodesicRequest {
            initial: spacetime.initial_state(),
            mass_geometric: physical.geometric_mass(),
            kappa: spacetime.kappa,
            samples: capped_samples(spacetime.geo_samples, solver.max_geodesic_samples),
            delta: spacetime.geo_delta,
        };
        let surface = SurfaceInterpolator::from_field(&field);
        let trajectory = integrate_geodesic(integrator, &request, &solver.tolerances());
        let warped = warp_trajectory(&trajectory, &physical, &surface);
        GeodesicPath {
            trajectory,
            warped,
            surface,
        }
    });

    info!(
        "Recomputed spacetime for {} ({} M☉, Rs = {:.1} m) in {:?}",
        spacetime.name,
        spacetime.mass,
        physical.schwarzschild_radius,
        started.elapsed()
    );

    SpacetimeSnapshot {
        physical,
        field,
        geodesic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::DormandPrince45;

    #[test]
    fn test_disabled_geodesic_skips_integration() {
        let spacetime = SpacetimeConfig::default().with_plot_geodesic(false);
        let snapshot = compute_snapshot(&spacetime, &SolverConfig::default(), &DormandPrince45);
        assert!(snapshot.geodesic.is_none());
        assert_eq!(snapshot.field.grid.shape(), (15, 15));
    }

    #[test]
    fn test_field_only_snapshot_accepts_degenerate_radius() {
        for view_radius in [0.0, -100.0] {
            let spacetime = SpacetimeConfig::default()
                .with_plot_geodesic(false)
                .with_view_radius(view_radius);
            let snapshot = compute_snapshot(&spacetime, &SolverConfig::default(), &DormandPrince45);
            assert!(snapshot.geodesic.is_none());
            assert!(snapshot.field.grid.values().iter().all(|w| w.is_finite()));
        }
    }

    #[test]
    fn test_negative_delta_snapshot() {
        let spacetime = SpacetimeConfig {
            geo_samples: 200,
            geo_delta: -2000.0,
            ..SpacetimeConfig::default()
        };
        let snapshot = compute_snapshot(&spacetime, &SolverConfig::default(), &DormandPrince45);
        let path = snapshot.geodesic.expect("geodesic enabled by default");
        assert_eq!(path.trajectory.len(), 201);
        assert_eq!(path.trajectory.times()[200], -400_000.0);
        assert!(path.warped.is_finite());
    }

    #[test]
    fn test_sample_cap() {
        assert_eq!(capped_samples(2000, None), 2000);
        assert_eq!(capped_samples(2000, Some(5000)), 2000);
        assert_eq!(capped_samples(2000, Some(100)), 100);

        let solver = SolverConfig {
            max_geodesic_samples: Some(10),
            ..SolverConfig::default()
        };
        let snapshot = compute_snapshot(&SpacetimeConfig::default(), &solver, &DormandPrince45);
        let path = snapshot.geodesic.expect("geodesic enabled by default");
        assert_eq!(path.trajectory.len(), 11);
        assert_eq!(path.warped.len(), 11);
    }
}
