//! Spacetime plugin - Self-contained plugin pattern
//!
//! Owns the configuration resources, the active integrator, and the
//! recomputation of the [`SpacetimeSnapshot`](crate::field::SpacetimeSnapshot)
//! whenever the [`SpacetimeConfig`] resource is replaced. Commands never edit
//! the configuration in place; each one produces a fresh value.

use crate::field::compute_snapshot;
use crate::physics::integrators::{DormandPrince45, Integrator};
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::physics::resources::CurrentIntegrator;
use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpacetimeSet {
    Input,
    Commands,
    Recompute,
    Render,
}

pub struct SpacetimePlugin {
    config: Option<VisualizerConfig>,
}

impl SpacetimePlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: VisualizerConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SpacetimePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SpacetimePlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(VisualizerConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let registry = IntegratorRegistry::new().with_standard_integrators();
        let integrator: Box<dyn Integrator> = match registry.create(&config.solver.integrator) {
            Ok(integrator) => integrator,
            Err(e) => {
                warn!(
                    "Failed to create integrator '{}': {}. Falling back to rk45",
                    config.solver.integrator, e
                );
                Box::new(DormandPrince45)
            }
        };
        info!("Using integrator: {}", integrator.name());

        app.insert_resource(CurrentIntegrator(integrator));
        app.insert_resource(registry);
        app.insert_resource(InitialSpacetime(config.spacetime.clone()));
        app.insert_resource(config.spacetime);
        app.insert_resource(config.solver);
        app.insert_resource(config.rendering);
        app.init_resource::<CurrentSnapshot>();
        app.init_resource::<PlaybackCursor>();

        app.add_event::<SpacetimeCommand>();

        app.configure_sets(
            Update,
            (
                SpacetimeSet::Input,
                SpacetimeSet::Commands,
                SpacetimeSet::Recompute,
                SpacetimeSet::Render,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                (
                    handle_parameter_commands,
                    handle_toggle_pause_command,
                    handle_quit_command,
                )
                    .in_set(SpacetimeSet::Commands),
                recompute_snapshot
                    .in_set(SpacetimeSet::Recompute)
                    .run_if(resource_changed::<SpacetimeConfig>),
            ),
        );
    }
}

/// Applies parameter, toggle, and reset commands by replacing the configuration
pub fn handle_parameter_commands(
    mut commands_reader: EventReader<SpacetimeCommand>,
    mut spacetime: ResMut<SpacetimeConfig>,
    initial: Res<InitialSpacetime>,
) {
    for command in commands_reader.read() {
        let next = match *command {
            SpacetimeCommand::Nudge { parameter, steps } => {
                let next = parameter.nudged(&spacetime, &initial, steps);
                debug!("{} set to {}", parameter.label(), parameter.value(&next));
                next
            }
            SpacetimeCommand::ToggleGeodesic => {
                let next = spacetime.with_plot_geodesic(!spacetime.plot_geodesic);
                info!(
                    "Geodesic {}",
                    if next.plot_geodesic { "enabled" } else { "disabled" }
                );
                next
            }
            SpacetimeCommand::Reset => {
                info!("Restoring initial parameters");
                initial.0.clone()
            }
            _ => continue,
        };
        spacetime.set_if_neq(next);
    }
}

pub fn handle_toggle_pause_command(
    mut commands_reader: EventReader<SpacetimeCommand>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for command in commands_reader.read() {
        if matches!(command, SpacetimeCommand::TogglePause) {
            next_state.set(current_state.get().toggled());
        }
    }
}

pub fn handle_quit_command(
    mut commands_reader: EventReader<SpacetimeCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if commands_reader
        .read()
        .any(|command| matches!(command, SpacetimeCommand::Quit))
    {
        exit.write_default();
    }
}

/// One full, blocking recomputation per configuration change
pub fn recompute_snapshot(
    spacetime: Res<SpacetimeConfig>,
    solver: Res<SolverConfig>,
    integrator: Res<CurrentIntegrator>,
    mut snapshot: ResMut<CurrentSnapshot>,
    mut cursor: ResMut<PlaybackCursor>,
) {
    if !(spacetime.view_radius.is_finite() && spacetime.view_radius > 0.0) {
        warn!(
            "Skipping recomputation: view radius must be positive, got {}",
            spacetime.view_radius
        );
        return;
    }

    **snapshot = Some(compute_snapshot(&spacetime, &solver, &*integrator.0));
    *cursor = PlaybackCursor::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, send_command};

    fn quick_config() -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.spacetime.geo_samples = 50;
        config
    }

    fn spacetime_app() -> App {
        let mut app = create_test_app();
        app.add_plugins(SpacetimePlugin::with_config(quick_config()));
        app.update();
        app
    }

    #[test]
    fn test_first_frame_computes_snapshot() {
        let app = spacetime_app();
        let snapshot = app.world().resource::<CurrentSnapshot>();
        let snapshot = snapshot.0.as_ref().expect("snapshot after first frame");
        assert_eq!(snapshot.field.grid.shape(), (15, 15));
        assert_eq!(snapshot.geodesic.as_ref().map(|path| path.trajectory.len()), Some(51));
    }

    #[test]
    fn test_toggle_geodesic_recomputes_without_path() {
        let mut app = spacetime_app();
        send_command(&mut app, SpacetimeCommand::ToggleGeodesic);

        assert!(!app.world().resource::<SpacetimeConfig>().plot_geodesic);
        let snapshot = app.world().resource::<CurrentSnapshot>();
        assert!(snapshot.0.as_ref().is_some_and(|s| s.geodesic.is_none()));
    }

    #[test]
    fn test_nudge_then_reset() {
        let mut app = spacetime_app();
        send_command(
            &mut app,
            SpacetimeCommand::Nudge {
                parameter: SpacetimeParameter::X0,
                steps: -10,
            },
        );
        assert_eq!(app.world().resource::<SpacetimeConfig>().x0, 45_000.0);

        send_command(&mut app, SpacetimeCommand::Reset);
        assert_eq!(
            *app.world().resource::<SpacetimeConfig>(),
            quick_config().spacetime
        );
    }

    #[test]
    fn test_unknown_integrator_falls_back() {
        let mut config = quick_config();
        config.solver.integrator = "leapfrog".to_string();

        let mut app = create_test_app();
        app.add_plugins(SpacetimePlugin::with_config(config));
        app.update();

        assert_eq!(app.world().resource::<CurrentIntegrator>().0.name(), "rk45");
        assert!(app.world().resource::<CurrentSnapshot>().is_some());
    }

    #[test]
    fn test_pause_toggle() {
        let mut app = spacetime_app();
        send_command(&mut app, SpacetimeCommand::TogglePause);
        app.update();
        assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Paused);

        send_command(&mut app, SpacetimeCommand::TogglePause);
        app.update();
        assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Running);
    }
}
