//! Testing utilities for Bevy systems.

#![cfg(test)]

use std::time::Duration;

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use crate::menus::Menu;
use crate::screens::GameState;

/// Minimal app with time, states and a virtual clock that accepts long test steps.
pub fn create_base_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app.init_state::<Menu>();
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(Duration::from_secs(60));
    app
}

/// Moves the app into `GameState::InGame` and runs the transition.
pub fn transition_to_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
}

/// Runs one update in which exactly `dt` of time passes.
pub fn advance_and_update(app: &mut App, dt: Duration) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(dt));
    app.update();
}

/// Asserts how many entities match filter `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let mut query = app.world_mut().query_filtered::<Entity, F>();
    let actual = query.iter(app.world()).count();
    assert_eq!(
        actual, expected,
        "expected {expected} entities matching filter, found {actual}"
    );
}

/// Collects every message of type `M` written during the test.
#[derive(Resource, Debug)]
pub struct Captured<M: Message>(pub Vec<M>);

impl<M: Message + Clone> Captured<M> {
    pub fn install(app: &mut App) {
        app.add_message::<M>();
        app.insert_resource(Self(Vec::new()));
        app.add_systems(PostUpdate, capture::<M>);
    }
}

fn capture<M: Message + Clone>(mut reader: MessageReader<M>, mut captured: ResMut<Captured<M>>) {
    captured.0.extend(reader.read().cloned());
}
