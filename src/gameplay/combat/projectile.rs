//! Straight-line projectiles: spawning, enemy hits, piercing and expiry.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::damage::DamageMessage;
use crate::Z_PROJECTILE;
use crate::gameplay::arena::{TILE_SIZE, in_world};
use crate::gameplay::enemies::Enemy;
use crate::gameplay::status::StatusEffects;
use crate::gameplay::Health;
use crate::screens::GameState;
use crate::third_party::within_radius;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Overlap distance between a projectile and an enemy.
pub const PROJECTILE_HIT_RADIUS: f32 = TILE_SIZE;

/// Projectiles despawn after this long even if still on screen.
pub const PROJECTILE_LIFETIME_SECS: f32 = 3.0;

const PROJECTILE_SIZE: f32 = 6.0;

// === Components ===

/// Remaining pierce budget and the enemies already struck.
#[derive(Debug, Clone, Default)]
pub struct Pierce {
    pub remaining: u32,
    pub hit: HashSet<Entity>,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub damage: f32,
    pub pierce: Option<Pierce>,
    pub freeze_secs: Option<f32>,
    pub lifetime: Timer,
}

/// What a projectile does on touching an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitVerdict {
    /// Already struck this enemy; pass through without damage.
    Skip,
    HitAndContinue,
    HitAndDespawn,
}

impl Projectile {
    /// Records a hit on `target`.
    ///
    /// A projectile with `max_pierces = n` damages `n + 1` distinct enemies, then despawns.
    pub fn register_hit(&mut self, target: Entity) -> HitVerdict {
        let Some(pierce) = self.pierce.as_mut() else {
            return HitVerdict::HitAndDespawn;
        };
        if !pierce.hit.insert(target) {
            return HitVerdict::Skip;
        }
        if pierce.remaining == 0 {
            return HitVerdict::HitAndDespawn;
        }
        pierce.remaining -= 1;
        HitVerdict::HitAndContinue
    }
}

/// Everything needed to launch a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub max_pierces: Option<u32>,
    pub freeze_secs: Option<f32>,
    pub color: Color,
}

pub fn spawn_projectile(commands: &mut Commands, spec: ProjectileSpec) -> Entity {
    commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                damage: spec.damage,
                pierce: spec.max_pierces.map(|remaining| Pierce {
                    remaining,
                    hit: HashSet::default(),
                }),
                freeze_secs: spec.freeze_secs,
                lifetime: Timer::from_seconds(PROJECTILE_LIFETIME_SECS, TimerMode::Once),
            },
            RigidBody::Kinematic,
            LinearVelocity(spec.velocity),
            Sprite::from_color(spec.color, Vec2::splat(PROJECTILE_SIZE)),
            Transform::from_translation(spec.origin.extend(Z_PROJECTILE)),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

// === Systems ===

fn projectile_hits(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile, &Transform), Without<Enemy>>,
    mut enemies: Query<(Entity, &Transform, &Health, &mut StatusEffects), With<Enemy>>,
    mut damage: MessageWriter<DamageMessage>,
) {
    for (entity, mut projectile, transform) in &mut projectiles {
        let position = transform.translation.truncate();
        for (enemy, enemy_transform, health, mut effects) in &mut enemies {
            if health.is_depleted()
                || !within_radius(
                    position,
                    enemy_transform.translation.truncate(),
                    PROJECTILE_HIT_RADIUS,
                )
            {
                continue;
            }
            let verdict = projectile.register_hit(enemy);
            if verdict == HitVerdict::Skip {
                continue;
            }
            damage.write(DamageMessage::new(enemy, projectile.damage));
            if let Some(secs) = projectile.freeze_secs {
                effects.freeze(secs);
            }
            if verdict == HitVerdict::HitAndDespawn {
                commands.entity(entity).try_despawn();
                break;
            }
        }
    }
}

fn expire_projectiles(
    time: Res<Time>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile, &Transform)>,
) {
    for (entity, mut projectile, transform) in &mut projectiles {
        let expired = projectile.lifetime.tick(time.delta()).is_finished();
        if expired || !in_world(transform.translation.truncate(), TILE_SIZE) {
            commands.entity(entity).try_despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (projectile_hits, expire_projectiles)
            .chain()
            .in_set(GameSet::Collision)
            .run_if(gameplay_running),
    );
}
