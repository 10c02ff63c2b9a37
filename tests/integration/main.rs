mod session_reset;
mod state_transitions;

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

/// Headless app running the whole simulation without physics or a window.
pub fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(InputPlugin);
    app.insert_resource(serpent_arena::gameplay::session::SessionConfig {
        seed: Some(7),
        hero: serpent_arena::gameplay::attacks::hero::HeroClass::Archer,
    });
    app.add_plugins(serpent_arena::simulation_plugin);
    app
}

/// Runs the loading frame and the transition into the session.
pub fn enter_game(app: &mut App) {
    app.update();
    app.update();
}

/// Number of entities matching filter `F`.
pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, F>();
    query.iter(app.world()).count()
}
