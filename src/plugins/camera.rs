//! Camera plugin - Self-contained plugin pattern
//!
//! Spawns an orbit camera looking down on the warped surface from above
//! its rim, at a distance derived from the rendered scene extent.

use crate::prelude::*;
use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use bevy_panorbit_camera::TouchControls;
use bevy_panorbit_camera::TrackpadBehavior;

/// Camera distance as a multiple of the scene extent
pub const CAMERA_DISTANCE_MULTIPLIER: f32 = 2.5;

/// Initial elevation above the surface plane, in radians
pub const CAMERA_PITCH: f32 = 0.6;

/// Plugin that handles camera setup and control
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PanOrbitCameraPlugin>() {
            app.add_plugins(PanOrbitCameraPlugin);
        }
        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, rendering: Res<RenderingConfig>) {
    commands.spawn((
        Name::new("Main Camera"),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            hdr: true,
            ..default()
        },
        Camera3d::default(),
        Tonemapping::AcesFitted,
        Bloom::NATURAL,
        Msaa::Sample4,
        PanOrbitCamera {
            allow_upside_down: false,
            focus: Vec3::ZERO,
            pan_smoothness: 0.0,
            radius: Some(rendering.scene_extent * CAMERA_DISTANCE_MULTIPLIER),
            pitch: Some(CAMERA_PITCH),
            touch_enabled: true,
            touch_controls: TouchControls::OneFingerOrbit,
            trackpad_behavior: TrackpadBehavior::blender_default(),
            trackpad_pinch_to_zoom_enabled: true,
            ..default()
        },
    ));
}
