use bevy::log::{Level, LogPlugin};
use clap::Parser;
use spacewarp::cli::{self, Args};
use spacewarp::prelude::*;
use spacewarp::{CameraPlugin, ControlsPlugin, HudPlugin, SpacetimePlugin, VisualizationPlugin};

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_integrators {
        cli::handle_list_integrators();
        return AppExit::Success;
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    if args.profiles {
        cli::handle_print_profiles(&config);
        return AppExit::Success;
    }

    let title = format!("spacewarp: {}", config.spacetime.name);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level: if args.verbose {
                    Level::DEBUG
                } else {
                    Level::INFO
                },
                ..default()
            }),
    );
    app.init_state::<AppState>();
    app.add_plugins((
        SpacetimePlugin::with_config(config),
        ControlsPlugin,
        CameraPlugin,
        VisualizationPlugin,
        HudPlugin,
    ));

    app.run()
}
