//! Parameter HUD (Heads-Up Display)
//!
//! A text panel in the top-left corner showing the selected mass, its
//! Schwarzschild radius, and the current geodesic parameters. The text is
//! rebuilt only when the snapshot, the view mode, or the app state changes.

use crate::field::SpacetimeSnapshot;
use crate::physics::resources::CurrentIntegrator;
use crate::plugins::spacetime::SpacetimeSet;
use crate::prelude::*;

const KEY_HELP: &str =
    "R/F radius  WASD start  arrows velocity  G geodesic  V view  N reset  Space pause";

#[derive(Component, Copy, Clone, Default, PartialEq, Debug)]
struct HudTextNode;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud);
        app.add_systems(
            Update,
            update_hud_text.in_set(SpacetimeSet::Render).run_if(
                resource_changed::<CurrentSnapshot>
                    .or(resource_changed::<ViewMode>)
                    .or(state_changed::<AppState>),
            ),
        );
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(5.0),
            left: Val::Px(5.0),
            padding: UiRect::all(Val::Px(5.0)),
            ..default()
        },
        BorderRadius::all(Val::Px(5.0)),
        BackgroundColor(Color::srgba(0.2, 0.2, 0.2, 0.7)),
        children![(
            HudTextNode,
            Text::new("Computing…"),
            TextFont::default().with_font_size(12.0),
        )],
    ));
}

fn update_hud_text(
    mut text: Single<&mut Text, With<HudTextNode>>,
    spacetime: Res<SpacetimeConfig>,
    snapshot: Res<CurrentSnapshot>,
    integrator: Res<CurrentIntegrator>,
    view: Res<ViewMode>,
    state: Res<State<AppState>>,
) {
    text.0 = hud_text(
        &spacetime,
        snapshot.0.as_ref(),
        integrator.0.name(),
        *view,
        *state.get() == AppState::Paused,
    );
}

pub fn hud_text(
    spacetime: &SpacetimeConfig,
    snapshot: Option<&SpacetimeSnapshot>,
    integrator: &str,
    view: ViewMode,
    paused: bool,
) -> String {
    let horizon = snapshot.map_or_else(
        || "-".to_string(),
        |snapshot| format!("{:.1} m", snapshot.physical.schwarzschild_radius),
    );
    let geodesic = match snapshot.and_then(|snapshot| snapshot.geodesic.as_ref()) {
        Some(path) => format!(
            "{} samples, dt = {}",
            path.trajectory.len(),
            spacetime.geo_delta
        ),
        None => "off".to_string(),
    };

    [
        spacetime.name.clone(),
        format!("Mass        {:.3} M☉", spacetime.mass),
        format!("Rs          {horizon}"),
        format!("View radius {:.0} m", spacetime.view_radius),
        format!("Start       ({:.0}, {:.0}) m", spacetime.x0, spacetime.y0),
        format!("Velocity    ({:.2}, {:.2})", spacetime.v_x0, spacetime.v_y0),
        format!("kappa       {}", spacetime.kappa),
        format!("Geodesic    {geodesic}"),
        format!("Integrator  {integrator}"),
        format!(
            "View        {}{}",
            view.label(),
            if paused { " (paused)" } else { "" }
        ),
        String::new(),
        KEY_HELP.to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::compute_snapshot;
    use crate::physics::integrators::DormandPrince45;

    #[test]
    fn test_hud_text_before_first_snapshot() {
        let text = hud_text(&SpacetimeConfig::default(), None, "rk45", ViewMode::Surface, false);
        assert!(text.starts_with("Unknown Mass\n"));
        assert!(text.contains("Rs          -"));
        assert!(text.contains("Geodesic    off"));
        assert!(!text.contains("(paused)"));
    }

    #[test]
    fn test_hud_text_with_snapshot() {
        let mut spacetime = SpacetimeConfig::default();
        spacetime.geo_samples = 5;
        let snapshot = compute_snapshot(&spacetime, &SolverConfig::default(), &DormandPrince45);

        let text = hud_text(&spacetime, Some(&snapshot), "rk45", ViewMode::SunkenGrid, true);
        assert!(text.contains("Geodesic    6 samples, dt = 2000"));
        assert!(text.contains("View        sunken grid (paused)"));
        assert!(text.contains("Integrator  rk45"));
    }
}
