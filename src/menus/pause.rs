//! Pause menu: Esc opens it during a live session and closes it again.

use bevy::prelude::*;

use super::Menu;
use crate::gameplay_running;
use crate::theme::widget;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Pause), spawn_pause_menu);
    app.add_systems(Update, open_pause_menu.run_if(gameplay_running));
    app.add_systems(Update, handle_pause_input.run_if(in_state(Menu::Pause)));
}

fn spawn_pause_menu(mut commands: Commands) {
    commands.spawn((
        widget::overlay_root("Pause Menu"),
        DespawnOnExit(Menu::Pause),
        children![
            widget::header("PAUSED"),
            widget::prompt("Press ESC to Resume"),
        ],
    ));
}

fn open_pause_menu(keyboard: Res<ButtonInput<KeyCode>>, mut next_menu: ResMut<NextState<Menu>>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_menu.set(Menu::Pause);
    }
}

fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_menu.set(Menu::None);
    }
}
