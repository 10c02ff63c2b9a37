//! Restarting after game over rebuilds every session resource and entity.

use bevy::prelude::*;
use pretty_assertions::assert_eq;
use serpent_arena::gameplay::enemies::Enemy;
use serpent_arena::gameplay::progression::{Progress, Tuning};
use serpent_arena::gameplay::session::Session;
use serpent_arena::gameplay::snake::{Chain, Follower, Player};
use serpent_arena::menus::Menu;
use serpent_arena::screens::GameState;

use crate::{count, create_game_app, enter_game};

fn end_session(app: &mut App) {
    let world = app.world_mut();
    world.resource_mut::<Session>().game_over = true;
    world.resource_mut::<NextState<Menu>>().set(Menu::GameOver);
    app.update();
}

fn restart(app: &mut App) {
    let world = app.world_mut();
    world.resource_mut::<NextState<Menu>>().set(Menu::None);
    world
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();
    app.update();
}

#[test]
fn restart_resets_progress_and_entities() {
    let mut app = create_game_app();
    enter_game(&mut app);

    {
        let world = app.world_mut();
        world.spawn((Enemy { score_value: 5 }, DespawnOnExit(GameState::InGame)));
        let mut progress = world.resource_mut::<Progress>();
        progress.score = 250;
        progress.level = 4;
        world.resource_mut::<Tuning>().move_delay_ms = 90;
    }
    end_session(&mut app);
    assert_eq!(*app.world().resource::<State<Menu>>().get(), Menu::GameOver);

    restart(&mut app);

    let world = app.world();
    assert_eq!(*world.resource::<State<GameState>>().get(), GameState::InGame);
    assert_eq!(*world.resource::<State<Menu>>().get(), Menu::None);
    assert!(!world.resource::<Session>().game_over);
    assert_eq!(world.resource::<Progress>(), &Progress::default());
    assert_eq!(world.resource::<Tuning>(), &Tuning::default());
    assert!(world.resource::<Chain>().is_empty());
    assert!(!world.resource::<Time<Virtual>>().is_paused());

    assert_eq!(count::<With<Player>>(&mut app), 1);
    assert_eq!(count::<With<Enemy>>(&mut app), 0);
    assert_eq!(count::<With<Follower>>(&mut app), 0);
}
