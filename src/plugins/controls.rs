//! Controls plugin - Self-contained plugin pattern
//!
//! Translates keyboard input into [`SpacetimeCommand`] events. Holding shift
//! moves parameters ten notches at a time.

use crate::prelude::*;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};

/// Notches per key press while shift is held
pub const FAST_STEPS: i32 = 10;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            keyboard_input_handler.in_set(super::spacetime::SpacetimeSet::Input),
        );
    }
}

fn keyboard_input_handler(
    mut keyboard_events: EventReader<KeyboardInput>,
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<SpacetimeCommand>,
) {
    let steps = if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        FAST_STEPS
    } else {
        1
    };

    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        if let Some(command) = command_for_key(&event.logical_key, steps) {
            commands.write(command);
        }
    }
}

/// Key bindings; `steps` is the notch count for parameter keys
pub fn command_for_key(key: &Key, steps: i32) -> Option<SpacetimeCommand> {
    let nudge = |parameter, direction: i32| SpacetimeCommand::Nudge {
        parameter,
        steps: direction * steps,
    };

    match key {
        Key::Character(c) => match c.to_lowercase().as_str() {
            "r" => Some(nudge(SpacetimeParameter::ViewRadius, 1)),
            "f" => Some(nudge(SpacetimeParameter::ViewRadius, -1)),
            "d" => Some(nudge(SpacetimeParameter::X0, 1)),
            "a" => Some(nudge(SpacetimeParameter::X0, -1)),
            "w" => Some(nudge(SpacetimeParameter::Y0, 1)),
            "s" => Some(nudge(SpacetimeParameter::Y0, -1)),
            "g" => Some(SpacetimeCommand::ToggleGeodesic),
            "v" => Some(SpacetimeCommand::CycleView),
            "n" => Some(SpacetimeCommand::Reset),
            _ => None,
        },
        Key::ArrowRight => Some(nudge(SpacetimeParameter::VX0, 1)),
        Key::ArrowLeft => Some(nudge(SpacetimeParameter::VX0, -1)),
        Key::ArrowUp => Some(nudge(SpacetimeParameter::VY0, 1)),
        Key::ArrowDown => Some(nudge(SpacetimeParameter::VY0, -1)),
        Key::Space => Some(SpacetimeCommand::TogglePause),
        #[cfg(not(target_arch = "wasm32"))]
        Key::Escape => Some(SpacetimeCommand::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::spacetime::SpacetimePlugin;
    use crate::test_utils::create_test_app;

    fn character(c: &str) -> Key {
        Key::Character(c.into())
    }

    #[test]
    fn test_parameter_keys() {
        assert_eq!(
            command_for_key(&character("R"), 1),
            Some(SpacetimeCommand::Nudge {
                parameter: SpacetimeParameter::ViewRadius,
                steps: 1
            })
        );
        assert_eq!(
            command_for_key(&Key::ArrowLeft, FAST_STEPS),
            Some(SpacetimeCommand::Nudge {
                parameter: SpacetimeParameter::VX0,
                steps: -10
            })
        );
    }

    #[test]
    fn test_toggle_keys() {
        assert_eq!(command_for_key(&character("g"), 1), Some(SpacetimeCommand::ToggleGeodesic));
        assert_eq!(command_for_key(&character("v"), 1), Some(SpacetimeCommand::CycleView));
        assert_eq!(command_for_key(&Key::Space, 1), Some(SpacetimeCommand::TogglePause));
        assert_eq!(command_for_key(&character("z"), 1), None);
    }

    #[test]
    fn test_key_press_reaches_configuration() {
        let mut app = create_test_app();
        let mut config = VisualizerConfig::default();
        config.spacetime.geo_samples = 20;
        app.add_plugins((SpacetimePlugin::with_config(config), ControlsPlugin));
        app.update();

        app.world_mut().send_event(KeyboardInput {
            key_code: KeyCode::KeyW,
            logical_key: character("w"),
            state: ButtonState::Pressed,
            text: None,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
        app.update();

        assert_eq!(app.world().resource::<SpacetimeConfig>().y0, 50_000.0);

        app.world_mut().send_event(KeyboardInput {
            key_code: KeyCode::KeyS,
            logical_key: character("s"),
            state: ButtonState::Pressed,
            text: None,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
        app.update();

        assert_eq!(app.world().resource::<SpacetimeConfig>().y0, 49_500.0);
    }
}
