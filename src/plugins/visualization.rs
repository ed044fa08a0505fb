//! Visualization plugin - Self-contained plugin pattern
//!
//! Draws the current snapshot with gizmos: the warp surface (or the sunken
//! grid, or the flat radial contours), the geodesic path, the event horizon,
//! and a marker that plays the geodesic back while the app is running.

use crate::field::{SpacetimeSnapshot, WarpField, WarpGrid};
use crate::physics::math::linspace;
use crate::plugins::spacetime::SpacetimeSet;
use crate::prelude::*;
use bevy::color::Mix;
use bevy::color::palettes::css;
use core::f64::consts::TAU;

/// Lift keeping flat overlays above the sunken grid
const FLAT_OVERLAY_LIFT: f32 = 0.01;

const MARKER_RADIUS: f32 = 0.08;

const CONTOUR_SEGMENTS: usize = 64;

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewMode>();

        app.add_systems(
            Update,
            (
                handle_view_commands.in_set(SpacetimeSet::Commands),
                advance_playback
                    .in_set(SpacetimeSet::Render)
                    .run_if(in_state(AppState::Running)),
                (
                    draw_warp_surface.run_if(resource_equals(ViewMode::Surface)),
                    draw_sunken_grid.run_if(resource_equals(ViewMode::SunkenGrid)),
                    draw_radial_contours.run_if(resource_equals(ViewMode::Radial)),
                    draw_geodesic,
                    draw_event_horizon,
                    draw_playback_marker,
                )
                    .in_set(SpacetimeSet::Render)
                    .after(advance_playback),
            ),
        );
    }
}

/// Maps physical coordinates into the rendered scene.
///
/// The orbital plane becomes the world XZ plane; warp factors become height
/// along Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneScale {
    horizontal: Scalar,
    vertical: Scalar,
}

impl SceneScale {
    pub fn new(view_radius: Scalar, rendering: &RenderingConfig) -> Self {
        Self {
            horizontal: Scalar::from(rendering.scene_extent) / view_radius,
            vertical: Scalar::from(rendering.height_scale),
        }
    }

    pub fn to_world(&self, point: Vector, height: Scalar) -> Vec3 {
        Vec3::new(
            (point.x * self.horizontal) as f32,
            (height * self.vertical) as f32,
            (-point.y * self.horizontal) as f32,
        )
    }
}

/// `segments` points around a circle, the last one closing the loop
pub fn horizon_points(radius: Scalar, segments: usize) -> Vec<Vector> {
    linspace(0.0, TAU, segments)
        .into_iter()
        .map(|angle| Vector::from_angle(angle) * radius)
        .collect()
}

/// `count` warp levels evenly spaced strictly between the grid's extremes
pub fn contour_levels(grid: &WarpGrid, count: usize) -> Vec<Scalar> {
    let (low, high) = grid
        .values()
        .iter()
        .fold((Scalar::INFINITY, Scalar::NEG_INFINITY), |(low, high), &w| {
            (low.min(w), high.max(w))
        });
    if low >= high {
        return Vec::new();
    }
    let levels = linspace(low, high, count + 2);
    levels[1..=count].to_vec()
}

/// Radius at which the warp factor equals `level`, from `w² = 1 − Rs/r`
pub fn contour_radius(schwarzschild_radius: Scalar, level: Scalar) -> Option<Scalar> {
    if !(0.0..1.0).contains(&level) {
        return None;
    }
    let radius = schwarzschild_radius / (1.0 - level * level);
    (radius.is_finite() && radius > 0.0).then_some(radius)
}

/// Deep red at the horizon fading to blue where space is flat
fn warp_color(warp: Scalar) -> Color {
    css::CRIMSON
        .mix(&css::DEEP_SKY_BLUE, warp.clamp(0.0, 1.0) as f32)
        .into()
}

fn handle_view_commands(
    mut commands_reader: EventReader<SpacetimeCommand>,
    mut view: ResMut<ViewMode>,
) {
    for command in commands_reader.read() {
        if matches!(command, SpacetimeCommand::CycleView) {
            *view = view.next();
            info!("Showing {} view", view.label());
        }
    }
}

fn advance_playback(
    time: Res<Time>,
    rendering: Res<RenderingConfig>,
    snapshot: Res<CurrentSnapshot>,
    mut cursor: ResMut<PlaybackCursor>,
) {
    let len = snapshot
        .0
        .as_ref()
        .and_then(|snapshot| snapshot.geodesic.as_ref())
        .map_or(0, |path| path.warped.len());
    cursor.advance(rendering.playback_rate * time.delta_secs(), len);
}

/// Grid lines along rows and columns through `node(row, column)`
fn draw_field_lines(
    gizmos: &mut Gizmos,
    field: &WarpField,
    node: impl Fn(usize, usize) -> Vec3,
) {
    let lines = field.line_count();
    for row in 0..lines {
        gizmos.linestrip_gradient(
            (0..lines).map(|column| (node(row, column), warp_color(field.grid.get(row, column)))),
        );
    }
    for column in 0..lines {
        gizmos.linestrip_gradient(
            (0..lines).map(|row| (node(row, column), warp_color(field.grid.get(row, column)))),
        );
    }
}

fn draw_warp_surface(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    let field = &snapshot.field;
    draw_field_lines(&mut gizmos, field, |row, column| {
        scale.to_world(field.mesh.node(row, column), field.grid.get(row, column))
    });
}

fn draw_sunken_grid(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    let field = &snapshot.field;
    draw_field_lines(&mut gizmos, field, |row, column| {
        scale.to_world(field.warped_node(row, column), 0.0)
    });
}

/// Flat mesh shaded like a filled contour plot, plus one ring per warp level
fn draw_radial_contours(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    let field = &snapshot.field;
    draw_field_lines(&mut gizmos, field, |row, column| {
        scale.to_world(field.mesh.node(row, column), 0.0)
    });

    let rs = snapshot.physical.schwarzschild_radius;
    for level in contour_levels(&field.grid, field.line_count() * 2) {
        let Some(radius) = contour_radius(rs, level) else {
            continue;
        };
        if radius > spacetime.view_radius {
            continue;
        }
        gizmos.linestrip(
            horizon_points(radius, CONTOUR_SEGMENTS)
                .into_iter()
                .map(|point| scale.to_world(point, 0.0) + Vec3::Y * FLAT_OVERLAY_LIFT),
            warp_color(level),
        );
    }
}

/// World-space points of the geodesic for the current view
fn geodesic_world_points(
    snapshot: &SpacetimeSnapshot,
    scale: &SceneScale,
    view: ViewMode,
    rendering: &RenderingConfig,
) -> Vec<Vec3> {
    let Some(path) = snapshot.geodesic.as_ref() else {
        return Vec::new();
    };
    let offset = Scalar::from(rendering.geodesic_height_offset);
    path.warped
        .points
        .iter()
        .zip(&path.warped.heights)
        .map(|(&point, &height)| {
            if view.is_flat() {
                scale.to_world(point, 0.0) + Vec3::Y * FLAT_OVERLAY_LIFT
            } else {
                scale.to_world(point, height + offset)
            }
        })
        .collect()
}

fn draw_geodesic(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
    view: Res<ViewMode>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    gizmos.linestrip(
        geodesic_world_points(snapshot, &scale, *view, &rendering),
        css::GOLD,
    );
}

fn draw_event_horizon(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
    view: Res<ViewMode>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    let height = if view.is_flat() {
        0.0
    } else {
        Scalar::from(rendering.horizon_height)
    };
    gizmos.linestrip(
        horizon_points(snapshot.physical.schwarzschild_radius, rendering.horizon_segments)
            .into_iter()
            .map(|point| scale.to_world(point, height)),
        css::RED,
    );
}

fn draw_playback_marker(
    mut gizmos: Gizmos,
    snapshot: Res<CurrentSnapshot>,
    spacetime: Res<SpacetimeConfig>,
    rendering: Res<RenderingConfig>,
    view: Res<ViewMode>,
    cursor: Res<PlaybackCursor>,
) {
    let Some(snapshot) = snapshot.0.as_ref() else {
        return;
    };
    let scale = SceneScale::new(spacetime.view_radius, &rendering);
    let points = geodesic_world_points(snapshot, &scale, *view, &rendering);
    if let Some(index) = cursor.index(points.len()) {
        gizmos.sphere(
            Isometry3d::from_translation(points[index]),
            MARKER_RADIUS,
            css::WHITE,
        );
    }
}
