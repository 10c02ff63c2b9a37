//! Enemies: stats by level, spawning helpers and homing toward the head.

pub mod spawn;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::Z_ENEMY;
use crate::gameplay::arena::TILE_SIZE;
use crate::gameplay::combat::ContactDebounce;
use crate::gameplay::combat::health_bar::HealthBarConfig;
use crate::gameplay::snake::Player;
use crate::gameplay::status::{MoveSpeed, StatusEffects};
use crate::gameplay::{Health, Tint};
use crate::screens::GameState;
use crate::theme::palette;
use crate::third_party::home_toward;
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const BASE_ENEMY_SPEED: f32 = 40.0;
pub const ENEMY_SPEED_PER_LEVEL: f32 = 3.0;
pub const ENEMY_SPEED_JITTER: f32 = 10.0;
pub const MAX_ENEMY_HEALTH: u32 = 5;
/// Score (and experience) per point of enemy health.
pub const SCORE_PER_HEALTH: u32 = 5;

const ENEMY_SIZE: f32 = TILE_SIZE * 0.75;

// === Components ===

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub score_value: u32,
}

/// Rolled stats for one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: u32,
    pub score_value: u32,
}

// === Helpers ===

/// Health grows by one every three levels, capped.
#[must_use]
pub fn enemy_health(level: u32) -> u32 {
    (1 + level / 3).min(MAX_ENEMY_HEALTH)
}

#[allow(clippy::cast_precision_loss)] // level stays small
pub fn roll_enemy_stats(level: u32, rng: &mut impl Rng) -> EnemyStats {
    let base = ENEMY_SPEED_PER_LEVEL.mul_add(level as f32, BASE_ENEMY_SPEED);
    let health = enemy_health(level);
    EnemyStats {
        speed: base + rng.random_range(-ENEMY_SPEED_JITTER..=ENEMY_SPEED_JITTER),
        health,
        score_value: health * SCORE_PER_HEALTH,
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn spawn_enemy(commands: &mut Commands, position: Vec2, stats: EnemyStats) -> Entity {
    commands
        .spawn((
            Name::new("Enemy"),
            Enemy {
                score_value: stats.score_value,
            },
            Health::new(stats.health as f32),
            HealthBarConfig {
                width: ENEMY_SIZE,
                height: 3.0,
                y_offset: ENEMY_SIZE / 2.0 + 4.0,
            },
            MoveSpeed::new(stats.speed),
            StatusEffects::default(),
            ContactDebounce::default(),
            RigidBody::Kinematic,
            LinearVelocity::ZERO,
            Tint(palette::ENEMY),
            Sprite::from_color(palette::ENEMY, Vec2::splat(ENEMY_SIZE)),
            Transform::from_translation(position.extend(Z_ENEMY)),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

// === Systems ===

/// Points every enemy at the head with its current speed.
fn home_toward_player(
    player: Single<&Transform, With<Player>>,
    mut enemies: Query<
        (&Transform, &MoveSpeed, &mut LinearVelocity),
        (With<Enemy>, Without<Player>),
    >,
) {
    let target = player.translation.truncate();
    for (transform, speed, mut velocity) in &mut enemies {
        *velocity = home_toward(transform.translation.truncate(), target, speed.current);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>();
    app.add_systems(
        Update,
        home_toward_player
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );
    app.add_plugins(spawn::plugin);
}
