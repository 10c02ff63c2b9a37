//! Engineer classes: automatic specials fired by classed followers.

#![allow(clippy::cast_precision_loss)]

use bevy::prelude::*;
use rand::Rng;

use super::hazards::Hazard;
use super::{
    AttackOutcome, AttackPlan, AttackSink, Effect, EnemySnapshot, SpecialCooldown, beam_targets,
    chain_targets, cone_targets, falloff, nearest, within,
};
use crate::gameplay::arena::{ARENA_DIAGONAL, TILE_SIZE};
use crate::gameplay::combat::ProjectileSpec;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::fx::{AreaFlash, BeamFlash};
use crate::gameplay::progression::Progress;
use crate::gameplay::session::GameRng;
use crate::gameplay::snake::Follower;
use crate::gameplay::status::StatusKind;
use crate::gameplay::Facing;
use crate::theme::palette;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Cooldown reduction per level above 1.
pub const ENGINEER_COOLDOWN_REDUCTION_PER_LEVEL: f32 = 0.04;
pub const MAX_ENGINEER_COOLDOWN_REDUCTION: f32 = 0.4;
pub const MIN_ENGINEER_COOLDOWN_MS: f32 = 1500.0;
/// Random spread added to each cooldown after use.
pub const ENGINEER_COOLDOWN_JITTER_SECS: f32 = 0.3;

pub const CHRONO_RADIUS: f32 = TILE_SIZE * 4.0;
pub const CHRONO_SLOW: f32 = 0.3;
pub const CHRONO_SLOW_SECS: f32 = 3.0;

pub const VOLTAIC_RANGE: f32 = TILE_SIZE * 4.0;
pub const VOLTAIC_LINKS: usize = 3;
pub const VOLTAIC_DAMAGE: f32 = 2.0;
pub const VOLTAIC_SLOW: f32 = 0.5;
pub const VOLTAIC_SLOW_SECS: f32 = 1.0;

/// Enemy distance at which the ice ring and holy field bother casting.
pub const ICE_RING_TRIGGER_RANGE: f32 = TILE_SIZE * 4.0;
pub const HOLY_FIELD_TRIGGER_RANGE: f32 = TILE_SIZE * 3.0;

pub const NINJA_DAMAGE: f32 = 2.0;
pub const NINJA_STAR_SPEED: f32 = 300.0;
/// Each star damages this many enemies plus one.
pub const NINJA_PIERCES: u32 = 2;

pub const DARK_BEAM_DAMAGE: f32 = 3.0;
pub const DARK_BEAM_HALF_WIDTH: f32 = TILE_SIZE / 2.0;

pub const SHOTGUN_RANGE: f32 = TILE_SIZE * 5.0;
pub const SHOTGUN_HALF_ANGLE: f32 = std::f32::consts::PI / 8.0;
pub const SHOTGUN_DAMAGE: f32 = 4.0;
pub const SHOTGUN_MIN_FALLOFF: f32 = 0.3;

/// How far the pixie and shaman reach to place their hazards.
pub const HAZARD_CAST_RANGE: f32 = TILE_SIZE * 6.0;

// === Types ===

/// The special a classed follower fires on its own.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum EngineerClass {
    Chronotemporal,
    Voltaic,
    IceMage,
    Ninja,
    HolyBard,
    DarkMage,
    Shotgunner,
    Sniper,
    ShroomPixie,
    GoblinTrapper,
    Shaman,
}

/// Per-class tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineerStats {
    pub name: &'static str,
    pub base_cooldown_ms: f32,
    pub color: Color,
}

#[must_use]
pub const fn engineer_stats(class: EngineerClass) -> EngineerStats {
    let (name, base_cooldown_ms, color) = match class {
        EngineerClass::Chronotemporal => ("Chronotemporal", 4000.0, Color::srgb(0.75, 0.6, 0.95)),
        EngineerClass::Voltaic => ("Voltaic", 3500.0, Color::srgb(1.0, 0.9, 0.3)),
        EngineerClass::IceMage => ("Ice Mage", 4500.0, Color::srgb(0.6, 0.9, 1.0)),
        EngineerClass::Ninja => ("Ninja", 3000.0, Color::srgb(0.3, 0.3, 0.35)),
        EngineerClass::HolyBard => ("Holy Bard", 5000.0, Color::srgb(1.0, 0.95, 0.7)),
        EngineerClass::DarkMage => ("Dark Mage", 4000.0, Color::srgb(0.45, 0.2, 0.6)),
        EngineerClass::Shotgunner => ("Shotgunner", 3000.0, Color::srgb(0.8, 0.5, 0.25)),
        EngineerClass::Sniper => ("Sniper", 4500.0, Color::srgb(0.4, 0.55, 0.35)),
        EngineerClass::ShroomPixie => ("Shroom Pixie", 4000.0, Color::srgb(0.9, 0.45, 0.7)),
        EngineerClass::GoblinTrapper => ("Goblin Trapper", 5000.0, Color::srgb(0.5, 0.7, 0.2)),
        EngineerClass::Shaman => ("Shaman", 4500.0, Color::srgb(0.3, 0.75, 0.55)),
    };
    EngineerStats {
        name,
        base_cooldown_ms,
        color,
    }
}

impl EngineerClass {
    pub const ALL: [Self; 11] = [
        Self::Chronotemporal,
        Self::Voltaic,
        Self::IceMage,
        Self::Ninja,
        Self::HolyBard,
        Self::DarkMage,
        Self::Shotgunner,
        Self::Sniper,
        Self::ShroomPixie,
        Self::GoblinTrapper,
        Self::Shaman,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        engineer_stats(self).name
    }

    #[must_use]
    pub const fn color(self) -> Color {
        engineer_stats(self).color
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Cooldown at `level` before jitter, in seconds.
#[must_use]
pub fn engineer_cooldown_secs(class: EngineerClass, level: u32) -> f32 {
    let levels_gained = level.saturating_sub(1) as f32;
    let reduction = (ENGINEER_COOLDOWN_REDUCTION_PER_LEVEL * levels_gained)
        .min(MAX_ENGINEER_COOLDOWN_REDUCTION);
    let ms = (engineer_stats(class).base_cooldown_ms * (1.0 - reduction))
        .max(MIN_ENGINEER_COOLDOWN_MS);
    ms / 1000.0
}

// === Planning ===

/// Plans one engineer special from `caster`. An empty plan means no valid target.
pub fn plan_engineer_attack(
    class: EngineerClass,
    caster: Entity,
    origin: Vec2,
    enemies: &[EnemySnapshot],
) -> AttackPlan {
    let mut plan = AttackPlan::default();
    match class {
        EngineerClass::Chronotemporal => {
            for enemy in within(enemies, origin, CHRONO_RADIUS) {
                plan.push(Effect::Status {
                    target: enemy.entity,
                    status: StatusKind::Slow {
                        factor: CHRONO_SLOW,
                        secs: CHRONO_SLOW_SECS,
                    },
                });
            }
            if !plan.is_empty() {
                plan.push(Effect::Flash(AreaFlash {
                    position: origin,
                    radius: CHRONO_RADIUS,
                    color: class.color(),
                }));
            }
        }
        EngineerClass::Voltaic => {
            let mut from = origin;
            for link in chain_targets(enemies, origin, VOLTAIC_LINKS, VOLTAIC_RANGE) {
                plan.push(Effect::Damage {
                    target: link.entity,
                    amount: VOLTAIC_DAMAGE,
                });
                plan.push(Effect::Status {
                    target: link.entity,
                    status: StatusKind::Slow {
                        factor: VOLTAIC_SLOW,
                        secs: VOLTAIC_SLOW_SECS,
                    },
                });
                plan.push(Effect::Beam(BeamFlash {
                    from,
                    to: link.position,
                    color: class.color(),
                }));
                from = link.position;
            }
        }
        EngineerClass::IceMage => {
            if nearest(enemies, origin, ICE_RING_TRIGGER_RANGE).is_some() {
                plan.push(Effect::Hazard(Hazard::IceRing { origin }));
            }
        }
        EngineerClass::Ninja => {
            if !enemies.is_empty() {
                for facing in Facing::ALL {
                    plan.push(Effect::Projectile(ProjectileSpec {
                        origin,
                        velocity: facing.vector() * NINJA_STAR_SPEED,
                        damage: NINJA_DAMAGE,
                        max_pierces: Some(NINJA_PIERCES),
                        freeze_secs: None,
                        color: palette::PROJECTILE,
                    }));
                }
            }
        }
        EngineerClass::HolyBard => {
            if nearest(enemies, origin, HOLY_FIELD_TRIGGER_RANGE).is_some() {
                plan.push(Effect::Hazard(Hazard::HolyField { anchor: caster }));
            }
        }
        EngineerClass::DarkMage => {
            if let Some(target) = nearest(enemies, origin, f32::INFINITY) {
                let direction = target.position - origin;
                let hits = beam_targets(
                    enemies,
                    origin,
                    direction,
                    DARK_BEAM_HALF_WIDTH,
                    ARENA_DIAGONAL,
                );
                for enemy in &hits {
                    plan.push(Effect::Damage {
                        target: enemy.entity,
                        amount: DARK_BEAM_DAMAGE,
                    });
                }
                if !hits.is_empty() {
                    plan.push(Effect::Beam(BeamFlash {
                        from: origin,
                        to: origin + direction.normalize_or_zero() * ARENA_DIAGONAL,
                        color: class.color(),
                    }));
                }
            }
        }
        EngineerClass::Shotgunner => {
            if let Some(target) = nearest(enemies, origin, SHOTGUN_RANGE) {
                let direction = target.position - origin;
                let hits =
                    cone_targets(enemies, origin, direction, SHOTGUN_HALF_ANGLE, SHOTGUN_RANGE);
                for enemy in hits {
                    let distance = enemy.position.distance(origin);
                    let scale = falloff(distance, SHOTGUN_RANGE, SHOTGUN_MIN_FALLOFF);
                    plan.push(Effect::Damage {
                        target: enemy.entity,
                        amount: SHOTGUN_DAMAGE * scale,
                    });
                }
            }
        }
        EngineerClass::Sniper => {
            let target = enemies.iter().max_by(|a, b| {
                a.health.total_cmp(&b.health).then_with(|| {
                    // Nearer wins the tie, so it must compare greater.
                    b.position
                        .distance_squared(origin)
                        .total_cmp(&a.position.distance_squared(origin))
                })
            });
            if let Some(target) = target {
                plan.push(Effect::Hazard(Hazard::SniperMark {
                    target: target.entity,
                    origin,
                }));
            }
        }
        EngineerClass::ShroomPixie => {
            if let Some(target) = nearest(enemies, origin, HAZARD_CAST_RANGE) {
                plan.push(Effect::Hazard(Hazard::Mushroom {
                    position: target.position,
                }));
            }
        }
        EngineerClass::GoblinTrapper => {
            if !enemies.is_empty() {
                plan.push(Effect::Hazard(Hazard::Mine { position: origin }));
            }
        }
        EngineerClass::Shaman => {
            if let Some(target) = nearest(enemies, origin, HAZARD_CAST_RANGE) {
                plan.push(Effect::Hazard(Hazard::PoisonCloud {
                    position: target.position,
                }));
            }
        }
    }
    plan
}

// === Systems ===

fn fire_engineer_attacks(
    time: Res<Time>,
    progress: Res<Progress>,
    mut rng: ResMut<GameRng>,
    mut followers: Query<
        (Entity, &EngineerClass, &mut SpecialCooldown, &Transform),
        (With<Follower>, Without<Enemy>),
    >,
    mut sink: AttackSink,
) {
    for (entity, &class, mut cooldown, transform) in &mut followers {
        cooldown.0.tick(time.delta_secs());
        if !cooldown.0.is_ready() {
            continue;
        }

        let origin = transform.translation.truncate();
        let plan = plan_engineer_attack(class, entity, origin, &sink.snapshot());
        // No target: stay ready and retry next frame.
        if sink.apply(plan) == AttackOutcome::Fired {
            let jitter = rng
                .0
                .random_range(-ENGINEER_COOLDOWN_JITTER_SECS..=ENGINEER_COOLDOWN_JITTER_SECS);
            cooldown
                .0
                .trigger(engineer_cooldown_secs(class, progress.level) + jitter);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<EngineerClass>();
    app.add_systems(
        Update,
        fire_engineer_attacks
            .in_set(GameSet::Attack)
            .run_if(gameplay_running),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::Health;
    use crate::gameplay::attacks::Cooldown;
    use crate::gameplay::combat::DamageMessage;
    use crate::gameplay::status::StatusEffects;
    use crate::testing::{Captured, advance_and_update, create_base_test_app};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_engineer_test_app() -> App {
        let mut app = create_base_test_app();
        app.init_resource::<Progress>()
            .insert_resource(GameRng::seeded(5));
        app.add_message::<AreaFlash>().add_message::<BeamFlash>();
        Captured::<DamageMessage>::install(&mut app);
        app.add_systems(Update, fire_engineer_attacks);
        app
    }

    fn spawn_voltaic(app: &mut App, remaining_secs: f32) -> Entity {
        app.world_mut()
            .spawn((
                Follower,
                EngineerClass::Voltaic,
                SpecialCooldown(Cooldown {
                    remaining_secs,
                    max_secs: 3.5,
                }),
                Transform::default(),
            ))
            .id()
    }

    fn spawn_enemy(app: &mut App, x: f32) -> Entity {
        app.world_mut()
            .spawn((
                Enemy { score_value: 5 },
                Health::new(5.0),
                StatusEffects::default(),
                Transform::from_xyz(x, 0.0, 0.0),
            ))
            .id()
    }

    fn remaining(app: &App, follower: Entity) -> f32 {
        app.world()
            .get::<SpecialCooldown>(follower)
            .map_or(f32::NAN, |c| c.0.remaining_secs)
    }

    #[test]
    fn ready_engineer_fires_and_rolls_jittered_cooldown() {
        let mut app = create_engineer_test_app();
        let follower = spawn_voltaic(&mut app, 0.0);
        for i in 1..=5 {
            spawn_enemy(&mut app, 20.0 * i as f32);
        }

        app.update();

        let captured = app.world().resource::<Captured<DamageMessage>>();
        assert_eq!(captured.0.len(), 3);
        let secs = remaining(&app, follower);
        assert!((secs - 3.5).abs() <= ENGINEER_COOLDOWN_JITTER_SECS + 1e-4);
    }

    #[test]
    fn engineer_without_target_stays_ready() {
        let mut app = create_engineer_test_app();
        let follower = spawn_voltaic(&mut app, 0.0);
        spawn_enemy(&mut app, 700.0);

        app.update();

        assert_eq!(remaining(&app, follower), 0.0);
        assert!(app.world().resource::<Captured<DamageMessage>>().0.is_empty());
    }

    #[test]
    fn engineer_on_cooldown_waits() {
        let mut app = create_engineer_test_app();
        let follower = spawn_voltaic(&mut app, 1.0);
        spawn_enemy(&mut app, 20.0);
        app.update();

        advance_and_update(&mut app, Duration::from_millis(500));

        assert!(app.world().resource::<Captured<DamageMessage>>().0.is_empty());
        assert!((remaining(&app, follower) - 0.5).abs() < 1e-4);
    }
}
