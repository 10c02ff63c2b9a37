//! Overlays drawn on top of a live session: pause and game over.

mod game_over;
mod pause;

use bevy::prelude::*;

/// Overlay state, orthogonal to `GameState`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[states(scoped_entities)]
pub enum Menu {
    #[default]
    None,
    Pause,
    /// Final score, hero choice and restart.
    GameOver,
}

pub fn plugin(app: &mut App) {
    app.init_state::<Menu>();
    app.add_plugins((pause::plugin, game_over::plugin));

    // Any open overlay freezes virtual time. That stops physics (avian2d runs in
    // FixedPostUpdate, which accumulates from Time<Virtual>) and every gameplay timer.
    app.add_systems(OnExit(Menu::None), pause_virtual_time);
    app.add_systems(OnEnter(Menu::None), unpause_virtual_time);
}

fn pause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn unpause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}
