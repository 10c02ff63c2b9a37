//! Development tools, only included with the `dev` feature.
//!
//! Test spawners for enemies and engineers. This module is stripped from release builds.

use bevy::prelude::*;

use crate::gameplay::arena::{cell_to_world, edge_spawn_point, random_cell};
use crate::gameplay::attacks::engineer::EngineerClass;
use crate::gameplay::collectibles::spawn_engineer;
use crate::gameplay::enemies::{roll_enemy_stats, spawn_enemy};
use crate::gameplay::progression::Progress;
use crate::gameplay::session::GameRng;
use crate::gameplay_running;

/// Number of enemies spawned per E key press.
const ENEMIES_PER_SPAWN: u32 = 3;

fn debug_spawn_enemies(
    keyboard: Res<ButtonInput<KeyCode>>,
    progress: Res<Progress>,
    mut rng: ResMut<GameRng>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    for _ in 0..ENEMIES_PER_SPAWN {
        let position = edge_spawn_point(&mut rng.0);
        let stats = roll_enemy_stats(progress.level, &mut rng.0);
        spawn_enemy(&mut commands, position, stats);
    }
    debug!(count = ENEMIES_PER_SPAWN, "debug enemies spawned");
}

fn debug_spawn_engineer(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut rng: ResMut<GameRng>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(KeyCode::KeyG) {
        return;
    }
    let class = EngineerClass::random(&mut rng.0);
    let position = cell_to_world(random_cell(&mut rng.0));
    spawn_engineer(&mut commands, position, class, &mut rng.0);
    debug!(class = class.display_name(), "debug engineer spawned");
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (debug_spawn_enemies, debug_spawn_engineer)
            .in_set(crate::GameSet::Input)
            .run_if(gameplay_running),
    );
}
