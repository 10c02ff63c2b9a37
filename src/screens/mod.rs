//! Top-level screen states.

mod loading;

use bevy::prelude::*;

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[states(scoped_entities)]
pub enum GameState {
    /// Transitional state between sessions. Session resources are rebuilt on exit.
    #[default]
    Loading,
    /// A live session.
    InGame,
}

pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();
    app.add_plugins(loading::plugin);
}
