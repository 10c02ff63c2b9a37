//! Attacks: cooldowns, target selection and the sink that applies planned effects.
//!
//! Every attack is planned as a pure function of positions ([`AttackPlan`]) and
//! then applied through [`AttackSink`]. An empty plan means no valid target, in
//! which case the caller leaves its cooldown untouched.

pub mod engineer;
pub mod hazards;
pub mod hero;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::gameplay::Health;
use crate::gameplay::combat::{DamageMessage, ProjectileSpec, spawn_projectile};
use crate::gameplay::enemies::Enemy;
use crate::gameplay::fx::{AreaFlash, BeamFlash};
use crate::gameplay::status::{StatusEffects, StatusKind};
use hazards::{Hazard, spawn_hazard};

// === Cooldowns ===

/// Countdown gating an attack. `remaining_secs == 0` means ready.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Cooldown {
    pub remaining_secs: f32,
    pub max_secs: f32,
}

impl Cooldown {
    /// Starts fully cooling down.
    #[must_use]
    pub const fn new(max_secs: f32) -> Self {
        Self {
            remaining_secs: max_secs,
            max_secs,
        }
    }

    /// Starts ready to fire.
    #[must_use]
    pub const fn ready(max_secs: f32) -> Self {
        Self {
            remaining_secs: 0.0,
            max_secs,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining_secs <= 0.0
    }

    pub fn tick(&mut self, delta_secs: f32) {
        self.remaining_secs = (self.remaining_secs - delta_secs).max(0.0);
    }

    /// Restarts the countdown from `secs`, which also becomes the new maximum.
    pub fn trigger(&mut self, secs: f32) {
        self.max_secs = secs;
        self.remaining_secs = secs;
    }

    /// Fraction still to wait, in `[0, 1]`. Zero when ready.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max_secs <= 0.0 {
            return 0.0;
        }
        (self.remaining_secs / self.max_secs).clamp(0.0, 1.0)
    }
}

/// The hero's pointer-aimed attack.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BasicCooldown(pub Cooldown);

/// Hero special (Space) or a classed follower's automatic attack.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpecialCooldown(pub Cooldown);

// === Plans ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Fired,
    NoTarget,
}

/// A living enemy as seen by the planners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub entity: Entity,
    pub position: Vec2,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Damage { target: Entity, amount: f32 },
    Execute { target: Entity, score: u32 },
    Status { target: Entity, status: StatusKind },
    Knockback { target: Entity, from: Vec2, distance: f32 },
    Projectile(ProjectileSpec),
    Hazard(Hazard),
    Flash(AreaFlash),
    Beam(BeamFlash),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackPlan {
    pub effects: Vec<Effect>,
}

impl AttackPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Entities receiving damage, in order, without repeats.
    #[must_use]
    pub fn damaged(&self) -> Vec<Entity> {
        let mut targets = Vec::new();
        for effect in &self.effects {
            if let Effect::Damage { target, .. } | Effect::Execute { target, .. } = effect {
                if !targets.contains(target) {
                    targets.push(*target);
                }
            }
        }
        targets
    }
}

// === Targeting ===

/// Linear damage falloff: 1 at the center, `min_factor` at `radius` and beyond.
#[must_use]
pub fn falloff(distance: f32, radius: f32, min_factor: f32) -> f32 {
    if radius <= 0.0 {
        return 1.0;
    }
    let t = (distance / radius).clamp(0.0, 1.0);
    (min_factor - 1.0).mul_add(t, 1.0)
}

pub fn within(
    enemies: &[EnemySnapshot],
    center: Vec2,
    radius: f32,
) -> impl Iterator<Item = &EnemySnapshot> {
    enemies
        .iter()
        .filter(move |enemy| enemy.position.distance_squared(center) <= radius * radius)
}

#[must_use]
pub fn nearest(enemies: &[EnemySnapshot], from: Vec2, max_range: f32) -> Option<&EnemySnapshot> {
    within(enemies, from, max_range).min_by(|a, b| {
        a.position
            .distance_squared(from)
            .total_cmp(&b.position.distance_squared(from))
    })
}

/// Successive nearest unvisited enemies, each within `range` of the previous link.
#[must_use]
pub fn chain_targets(
    enemies: &[EnemySnapshot],
    from: Vec2,
    max_links: usize,
    range: f32,
) -> Vec<EnemySnapshot> {
    let mut links: Vec<EnemySnapshot> = Vec::with_capacity(max_links);
    let mut cursor = from;
    while links.len() < max_links {
        let next = within(enemies, cursor, range)
            .filter(|enemy| links.iter().all(|link| link.entity != enemy.entity))
            .min_by(|a, b| {
                a.position
                    .distance_squared(cursor)
                    .total_cmp(&b.position.distance_squared(cursor))
            });
        let Some(next) = next else {
            break;
        };
        cursor = next.position;
        links.push(*next);
    }
    links
}

/// Enemies in front of `origin` along `direction` and within `half_width` of the line.
#[must_use]
pub fn beam_targets(
    enemies: &[EnemySnapshot],
    origin: Vec2,
    direction: Vec2,
    half_width: f32,
    length: f32,
) -> Vec<EnemySnapshot> {
    let Some(dir) = direction.try_normalize() else {
        return Vec::new();
    };
    enemies
        .iter()
        .filter(|enemy| {
            let offset = enemy.position - origin;
            let along = offset.dot(dir);
            along >= 0.0 && along <= length && offset.perp_dot(dir).abs() <= half_width
        })
        .copied()
        .collect()
}

/// Enemies within `range` whose bearing is within `half_angle` radians of `direction`.
#[must_use]
pub fn cone_targets(
    enemies: &[EnemySnapshot],
    origin: Vec2,
    direction: Vec2,
    half_angle: f32,
    range: f32,
) -> Vec<EnemySnapshot> {
    let Some(dir) = direction.try_normalize() else {
        return Vec::new();
    };
    within(enemies, origin, range)
        .filter(|enemy| {
            let offset = enemy.position - origin;
            // An enemy exactly on the caster counts as in front.
            offset == Vec2::ZERO || dir.angle_to(offset).abs() <= half_angle
        })
        .copied()
        .collect()
}

// === Sink ===

/// Applies [`AttackPlan`]s to the world.
#[derive(SystemParam)]
pub struct AttackSink<'w, 's> {
    commands: Commands<'w, 's>,
    damage: MessageWriter<'w, DamageMessage>,
    flashes: MessageWriter<'w, AreaFlash>,
    beams: MessageWriter<'w, BeamFlash>,
    enemies: Query<
        'w,
        's,
        (Entity, &'static mut Transform, &'static Health, &'static mut StatusEffects),
        With<Enemy>,
    >,
}

impl AttackSink<'_, '_> {
    /// Living enemies and their positions.
    pub fn snapshot(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .filter(|(_, _, health, _)| !health.is_depleted())
            .map(|(entity, transform, health, _)| EnemySnapshot {
                entity,
                position: transform.translation.truncate(),
                health: health.current,
            })
            .collect()
    }

    /// Position of `target` if it is still a living enemy.
    pub fn position_of(&self, target: Entity) -> Option<Vec2> {
        self.enemies
            .get(target)
            .ok()
            .filter(|(_, _, health, _)| !health.is_depleted())
            .map(|(_, transform, _, _)| transform.translation.truncate())
    }

    pub fn apply(&mut self, plan: AttackPlan) -> AttackOutcome {
        if plan.is_empty() {
            return AttackOutcome::NoTarget;
        }
        for effect in plan.effects {
            match effect {
                Effect::Damage { target, amount } => {
                    self.damage.write(DamageMessage::new(target, amount));
                }
                Effect::Execute { target, score } => {
                    self.damage.write(DamageMessage::execute(target, score));
                }
                Effect::Status { target, status } => {
                    if let Ok((_, _, _, mut effects)) = self.enemies.get_mut(target) {
                        effects.apply(status);
                    }
                }
                Effect::Knockback {
                    target,
                    from,
                    distance,
                } => {
                    if let Ok((_, mut transform, _, _)) = self.enemies.get_mut(target) {
                        let push = (transform.translation.truncate() - from).normalize_or_zero();
                        transform.translation += (push * distance).extend(0.0);
                    }
                }
                Effect::Projectile(spec) => {
                    spawn_projectile(&mut self.commands, spec);
                }
                Effect::Hazard(hazard) => {
                    spawn_hazard(&mut self.commands, hazard);
                }
                Effect::Flash(flash) => {
                    self.flashes.write(flash);
                }
                Effect::Beam(beam) => {
                    self.beams.write(beam);
                }
            }
        }
        AttackOutcome::Fired
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<BasicCooldown>()
        .register_type::<SpecialCooldown>();
    app.add_plugins((hero::plugin, engineer::plugin, hazards::plugin));
}
