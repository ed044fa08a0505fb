//! Test utilities for plugin testing

use crate::prelude::*;

/// Creates a headless app with the Bevy plugins the spacetime systems rely on
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        bevy::input::InputPlugin,
        bevy::state::app::StatesPlugin,
    ));

    app.init_state::<AppState>();

    app
}

/// Sends a command and runs one frame
pub fn send_command(app: &mut App, command: SpacetimeCommand) {
    app.world_mut().send_event(command);
    app.update();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<ButtonInput<KeyCode>>());
        assert!(app.world().contains_resource::<State<AppState>>());
    }
}
