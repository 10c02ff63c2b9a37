//! Loading screen: shown for a single frame between sessions.

use bevy::prelude::*;

use super::GameState;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Loading), setup_loading_screen)
        .add_systems(
            Update,
            begin_session.run_if(in_state(GameState::Loading)),
        );
}

fn setup_loading_screen(mut commands: Commands) {
    commands.spawn((
        crate::theme::widget::header("Loading..."),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(40.0),
            top: Val::Percent(45.0),
            ..default()
        },
        DespawnOnExit(GameState::Loading),
    ));
}

/// Nothing to load: every sprite is a flat color, so go straight to the session.
fn begin_session(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
