//! Tests for game state transitions.

use bevy::prelude::*;
use pretty_assertions::assert_eq;
use serpent_arena::gameplay::collectibles::Pickup;
use serpent_arena::gameplay::snake::Player;
use serpent_arena::menus::Menu;
use serpent_arena::screens::GameState;

use crate::{count, create_game_app, enter_game};

#[test]
fn game_initializes_in_loading_state() {
    let app = create_game_app();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Loading);
}

#[test]
fn loading_moves_into_a_live_session() {
    let mut app = create_game_app();
    enter_game(&mut app);

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::InGame);
    assert_eq!(count::<With<Player>>(&mut app), 1);

    app.update();
    assert_eq!(count::<With<Pickup>>(&mut app), 1);
}

#[test]
fn opening_a_menu_freezes_virtual_time() {
    let mut app = create_game_app();
    enter_game(&mut app);

    app.world_mut()
        .resource_mut::<NextState<Menu>>()
        .set(Menu::Pause);
    app.update();

    assert!(app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn chosen_hero_leads_the_chain() {
    let mut app = create_game_app();
    enter_game(&mut app);

    let mut query = app.world_mut().query::<&Player>();
    let hero = query.single(app.world()).ok().map(|player| player.hero);
    assert_eq!(
        hero,
        Some(serpent_arena::gameplay::attacks::hero::HeroClass::Archer)
    );
}
