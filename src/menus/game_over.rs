//! Game-over overlay: final score and level, hero choice for the next run, restart.

use bevy::prelude::*;

use super::Menu;
use crate::gameplay::attacks::hero::HeroClass;
use crate::gameplay::progression::Progress;
use crate::gameplay::session::SessionConfig;
use crate::screens::GameState;
use crate::theme::{palette, widget};

/// Digit keys that pick the hero for the next run, in [`HeroClass::ALL`] order.
const HERO_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

/// Marker for the "next hero" line, refreshed when the choice changes.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NextHeroDisplay;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<NextHeroDisplay>();

    app.add_systems(OnEnter(Menu::GameOver), spawn_game_over_screen);
    app.add_systems(
        Update,
        (choose_hero, refresh_next_hero, restart)
            .chain()
            .run_if(in_state(Menu::GameOver)),
    );
}

fn next_hero_label(hero: HeroClass) -> String {
    format!("Next hero: {}", hero.display_name())
}

fn spawn_game_over_screen(
    mut commands: Commands,
    progress: Res<Progress>,
    config: Res<SessionConfig>,
) {
    commands.spawn((
        widget::overlay_root("Game Over Screen"),
        DespawnOnExit(Menu::GameOver),
        children![(
            Name::new("Game Over Panel"),
            Node {
                width: Val::Px(500.0),
                min_height: Val::Px(300.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceEvenly,
                padding: UiRect::all(Val::Px(40.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(palette::PANEL_BACKGROUND),
            BorderColor::all(palette::PANEL_BORDER),
            children![
                widget::text("GAME OVER", palette::FONT_SIZE_HEADER, palette::ENEMY),
                widget::label(format!(
                    "Score {}   Level {}",
                    progress.score, progress.level
                )),
                (NextHeroDisplay, widget::prompt(next_hero_label(config.hero))),
                widget::prompt("1 Warrior  2 Archer  3 Mage  |  R to Restart"),
            ],
        )],
    ));
}

fn choose_hero(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<SessionConfig>) {
    let chosen = HERO_KEYS
        .iter()
        .zip(HeroClass::ALL)
        .find(|(key, _)| keyboard.just_pressed(**key))
        .map(|(_, hero)| hero);
    if let Some(hero) = chosen {
        config.hero = hero;
    }
}

fn refresh_next_hero(
    config: Res<SessionConfig>,
    mut text: Query<&mut Text, With<NextHeroDisplay>>,
) {
    if !config.is_changed() {
        return;
    }
    for mut text in &mut text {
        text.0 = next_hero_label(config.hero);
    }
}

fn restart(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_game: ResMut<NextState<GameState>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        next_menu.set(Menu::None);
        next_game.set(GameState::Loading);
    }
}
