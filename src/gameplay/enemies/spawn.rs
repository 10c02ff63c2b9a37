//! Timed enemy waves from the screen edges.

use bevy::prelude::*;

use super::{roll_enemy_stats, spawn_enemy};
use crate::gameplay::arena::edge_spawn_point;
use crate::gameplay::progression::Progress;
use crate::gameplay::session::GameRng;
use crate::screens::GameState;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Seconds between enemy spawns.
pub const ENEMY_SPAWN_INTERVAL: f32 = 2.0;

// === Resource ===

/// Inserted on `OnEnter(GameState::InGame)`, reset each time the state is entered.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct EnemySpawnTimer(pub Timer);

impl Default for EnemySpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            ENEMY_SPAWN_INTERVAL,
            TimerMode::Repeating,
        ))
    }
}

// === Systems ===

fn reset_enemy_spawn_timer(mut commands: Commands) {
    commands.insert_resource(EnemySpawnTimer::default());
}

fn tick_enemy_spawner(
    time: Res<Time>,
    mut spawn_timer: ResMut<EnemySpawnTimer>,
    progress: Res<Progress>,
    mut rng: ResMut<GameRng>,
    mut commands: Commands,
) {
    let due = spawn_timer.0.tick(time.delta()).times_finished_this_tick();
    for _ in 0..due {
        let position = edge_spawn_point(&mut rng.0);
        let stats = roll_enemy_stats(progress.level, &mut rng.0);
        spawn_enemy(&mut commands, position, stats);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<EnemySpawnTimer>();
    app.init_resource::<EnemySpawnTimer>();

    app.add_systems(OnEnter(GameState::InGame), reset_enemy_spawn_timer);
    app.add_systems(
        Update,
        tick_enemy_spawner
            .in_set(GameSet::Spawn)
            .run_if(gameplay_running),
    );
}
