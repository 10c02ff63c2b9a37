//! Hero classes: the pointer-aimed basic attack and the Space special.

#![allow(clippy::cast_precision_loss)]

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::{
    AttackOutcome, AttackPlan, AttackSink, BasicCooldown, Effect, EnemySnapshot, SpecialCooldown,
    cone_targets, within,
};
use crate::gameplay::arena::TILE_SIZE;
use crate::gameplay::combat::ProjectileSpec;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::fx::AreaFlash;
use crate::gameplay::progression::{Progress, Tuning};
use crate::gameplay::session::GameRng;
use crate::gameplay::snake::{HeroInput, Player};
use crate::gameplay::status::StatusKind;
use crate::gameplay::Heading;
use crate::theme::palette;
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const BASE_BASIC_COOLDOWN_SECS: f32 = 0.5;
/// Basic cooldown reduction per level above 1, capped at [`MAX_BASIC_COOLDOWN_REDUCTION`].
pub const BASIC_COOLDOWN_REDUCTION_PER_LEVEL: f32 = 0.05;
pub const MAX_BASIC_COOLDOWN_REDUCTION: f32 = 0.5;

pub const WARRIOR_REACH: f32 = TILE_SIZE * 2.0;
/// Half-width of the warrior's swing, in radians.
pub const WARRIOR_ARC: f32 = 0.6;
pub const WARRIOR_DAMAGE: f32 = 2.0;
pub const WARRIOR_KNOCKBACK: f32 = 12.0;
pub const WARRIOR_SPECIAL_RADIUS: f32 = TILE_SIZE * 3.0;
pub const WARRIOR_SPECIAL_SCORE: u32 = 5;

pub const ARCHER_DAMAGE: f32 = 3.0;
pub const ARCHER_ARROW_SPEED: f32 = 320.0;
pub const ARCHER_SPEED_JITTER: f32 = 0.2;
pub const ARCHER_VOLLEY: usize = 8;

pub const MAGE_DAMAGE: f32 = 1.0;
pub const MAGE_BOLT_SPEED: f32 = 260.0;
pub const MAGE_BOLT_FREEZE_SECS: f32 = 1.5;
pub const MAGE_SPECIAL_FREEZE_SECS: f32 = 2.0;
pub const MAGE_SPECIAL_FLASH_RADIUS: f32 = TILE_SIZE * 4.0;

// === Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum HeroClass {
    #[default]
    Warrior,
    Archer,
    Mage,
}

impl HeroClass {
    pub const ALL: [Self; 3] = [Self::Warrior, Self::Archer, Self::Mage];

    /// Case-insensitive name lookup.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|hero| hero.display_name().eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Archer => "Archer",
            Self::Mage => "Mage",
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Warrior => Color::srgb(0.85, 0.35, 0.3),
            Self::Archer => Color::srgb(0.35, 0.8, 0.4),
            Self::Mage => Color::srgb(0.45, 0.5, 0.95),
        }
    }

    /// Plans the basic attack. `aim` is a direction from `caster`.
    pub fn plan_basic(
        self,
        caster: Vec2,
        aim: Vec2,
        enemies: &[EnemySnapshot],
        rng: &mut impl Rng,
    ) -> AttackPlan {
        let mut plan = AttackPlan::default();
        let Some(aim) = aim.try_normalize() else {
            return plan;
        };
        match self {
            Self::Warrior => {
                for enemy in cone_targets(enemies, caster, aim, WARRIOR_ARC, WARRIOR_REACH) {
                    plan.push(Effect::Damage {
                        target: enemy.entity,
                        amount: WARRIOR_DAMAGE,
                    });
                    plan.push(Effect::Knockback {
                        target: enemy.entity,
                        from: caster,
                        distance: WARRIOR_KNOCKBACK,
                    });
                }
                if !plan.is_empty() {
                    plan.push(Effect::Flash(AreaFlash {
                        position: caster + aim * WARRIOR_REACH / 2.0,
                        radius: WARRIOR_REACH / 2.0,
                        color: palette::DEFEAT_BURST,
                    }));
                }
            }
            Self::Archer => {
                let jitter = rng.random_range(-ARCHER_SPEED_JITTER..=ARCHER_SPEED_JITTER);
                plan.push(Effect::Projectile(ProjectileSpec {
                    origin: caster,
                    velocity: aim * ARCHER_ARROW_SPEED * (1.0 + jitter),
                    damage: ARCHER_DAMAGE,
                    max_pierces: None,
                    freeze_secs: None,
                    color: palette::PROJECTILE,
                }));
            }
            Self::Mage => {
                plan.push(Effect::Projectile(ProjectileSpec {
                    origin: caster,
                    velocity: aim * MAGE_BOLT_SPEED,
                    damage: MAGE_DAMAGE,
                    max_pierces: None,
                    freeze_secs: Some(MAGE_BOLT_FREEZE_SECS),
                    color: palette::FROST_PROJECTILE,
                }));
            }
        }
        plan
    }

    pub fn plan_special(self, caster: Vec2, enemies: &[EnemySnapshot]) -> AttackPlan {
        let mut plan = AttackPlan::default();
        match self {
            Self::Warrior => {
                for enemy in within(enemies, caster, WARRIOR_SPECIAL_RADIUS) {
                    plan.push(Effect::Execute {
                        target: enemy.entity,
                        score: WARRIOR_SPECIAL_SCORE,
                    });
                }
                if !plan.is_empty() {
                    plan.push(Effect::Flash(AreaFlash {
                        position: caster,
                        radius: WARRIOR_SPECIAL_RADIUS,
                        color: palette::DEFEAT_BURST,
                    }));
                }
            }
            Self::Archer => {
                for i in 0..ARCHER_VOLLEY {
                    let angle = TAU * i as f32 / ARCHER_VOLLEY as f32;
                    plan.push(Effect::Projectile(ProjectileSpec {
                        origin: caster,
                        velocity: Vec2::from_angle(angle) * ARCHER_ARROW_SPEED,
                        damage: ARCHER_DAMAGE,
                        max_pierces: None,
                        freeze_secs: None,
                        color: palette::PROJECTILE,
                    }));
                }
            }
            Self::Mage => {
                for enemy in enemies {
                    plan.push(Effect::Status {
                        target: enemy.entity,
                        status: StatusKind::Freeze {
                            secs: MAGE_SPECIAL_FREEZE_SECS,
                        },
                    });
                }
                if !plan.is_empty() {
                    plan.push(Effect::Flash(AreaFlash {
                        position: caster,
                        radius: MAGE_SPECIAL_FLASH_RADIUS,
                        color: palette::ICE_RING,
                    }));
                }
            }
        }
        plan
    }
}

/// Basic cooldown at `level`: 5% shorter per level above 1, at most 50% shorter.
#[must_use]
pub fn basic_cooldown_secs(level: u32) -> f32 {
    let levels_gained = level.saturating_sub(1) as f32;
    let reduction =
        (BASIC_COOLDOWN_REDUCTION_PER_LEVEL * levels_gained).min(MAX_BASIC_COOLDOWN_REDUCTION);
    BASE_BASIC_COOLDOWN_SECS * (1.0 - reduction)
}

// === Systems ===

fn hero_attacks(
    time: Res<Time>,
    input: Res<HeroInput>,
    progress: Res<Progress>,
    tuning: Res<Tuning>,
    mut rng: ResMut<GameRng>,
    mut hero: Single<
        (
            &Player,
            &Transform,
            &Heading,
            &mut BasicCooldown,
            &mut SpecialCooldown,
        ),
        Without<Enemy>,
    >,
    mut sink: AttackSink,
) {
    let (player, transform, heading, basic, special) = &mut *hero;
    basic.0.tick(time.delta_secs());
    special.0.tick(time.delta_secs());

    let caster = transform.translation.truncate();
    let class = player.hero;

    if input.basic && basic.0.is_ready() {
        let aim = input
            .aim
            .map(|target| target - caster)
            .filter(|dir| *dir != Vec2::ZERO)
            .unwrap_or_else(|| heading.0.vector());
        let plan = class.plan_basic(caster, aim, &sink.snapshot(), &mut rng.0);
        if sink.apply(plan) == AttackOutcome::Fired {
            basic.0.trigger(basic_cooldown_secs(progress.level));
        }
    }

    if input.special && special.0.is_ready() {
        let plan = class.plan_special(caster, &sink.snapshot());
        match sink.apply(plan) {
            AttackOutcome::Fired => special.0.trigger(tuning.special_cooldown_secs()),
            AttackOutcome::NoTarget => {
                debug!(hero = class.display_name(), "special found no target");
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HeroClass>();
    app.add_systems(
        Update,
        hero_attacks
            .in_set(GameSet::Attack)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::attacks::test_support::enemies_at;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn projectiles(plan: &AttackPlan) -> Vec<ProjectileSpec> {
        plan.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Projectile(spec) => Some(*spec),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parse_accepts_any_case() {
        assert_eq!(HeroClass::parse("ARCHER"), Some(HeroClass::Archer));
        assert_eq!(HeroClass::parse(" mage "), Some(HeroClass::Mage));
        assert_eq!(HeroClass::parse("bard"), None);
    }

    #[test]
    fn basic_cooldown_scales_and_caps() {
        assert!((basic_cooldown_secs(1) - 0.5).abs() < 1e-6);
        assert!((basic_cooldown_secs(3) - 0.45).abs() < 1e-6);
        assert!((basic_cooldown_secs(50) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn warrior_swing_hits_only_inside_arc() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(0);
        let enemies = enemies_at(
            &mut world,
            &[
                Vec2::new(40.0, 0.0),
                Vec2::new(0.0, 40.0),
                Vec2::new(200.0, 0.0),
            ],
        );

        let plan = HeroClass::Warrior.plan_basic(Vec2::ZERO, Vec2::X, &enemies, &mut rng);

        assert_eq!(plan.damaged(), vec![enemies[0].entity]);
    }

    #[test]
    fn warrior_swing_at_nothing_is_no_target() {
        let mut rng = StdRng::seed_from_u64(0);
        let plan = HeroClass::Warrior.plan_basic(Vec2::ZERO, Vec2::X, &[], &mut rng);
        assert!(plan.is_empty());
    }

    #[test]
    fn archer_arrow_speed_is_jittered_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let plan = HeroClass::Archer.plan_basic(Vec2::ZERO, Vec2::Y, &[], &mut rng);
            let arrows = projectiles(&plan);
            assert_eq!(arrows.len(), 1);
            let speed = arrows[0].velocity.length();
            assert!((256.0 - 1e-3..=384.0 + 1e-3).contains(&speed));
        }
    }

    #[test]
    fn mage_bolt_carries_freeze() {
        let mut rng = StdRng::seed_from_u64(0);
        let plan = HeroClass::Mage.plan_basic(Vec2::ZERO, Vec2::X, &[], &mut rng);
        assert_eq!(projectiles(&plan)[0].freeze_secs, Some(MAGE_BOLT_FREEZE_SECS));
    }

    #[test]
    fn warrior_special_executes_everything_in_radius() {
        let mut world = World::new();
        let enemies = enemies_at(
            &mut world,
            &[
                Vec2::new(90.0, 0.0),
                Vec2::new(-50.0, 20.0),
                Vec2::new(97.0, 0.0),
            ],
        );

        let plan = HeroClass::Warrior.plan_special(Vec2::ZERO, &enemies);

        assert_eq!(plan.damaged(), vec![enemies[0].entity, enemies[1].entity]);
        assert!(HeroClass::Warrior.plan_special(Vec2::ZERO, &[]).is_empty());
    }

    #[test]
    fn archer_volley_covers_eight_directions() {
        let plan = HeroClass::Archer.plan_special(Vec2::ZERO, &[]);
        let arrows = projectiles(&plan);
        assert_eq!(arrows.len(), ARCHER_VOLLEY);
        assert!(arrows.iter().any(|a| a.velocity.normalize().abs_diff_eq(Vec2::NEG_Y, 1e-5)));
        assert!(
            arrows
                .iter()
                .any(|a| a.velocity.normalize().abs_diff_eq(Vec2::ONE.normalize(), 1e-5))
        );
    }

    #[test]
    fn mage_special_needs_enemies() {
        assert!(HeroClass::Mage.plan_special(Vec2::ZERO, &[]).is_empty());
    }

    #[test]
    fn mage_special_flashes_around_the_caster() {
        let mut world = World::new();
        let enemies = enemies_at(&mut world, &[Vec2::new(500.0, 0.0)]);
        let caster = Vec2::new(10.0, 20.0);

        let plan = HeroClass::Mage.plan_special(caster, &enemies);

        let flash = plan.effects.iter().find_map(|effect| match effect {
            Effect::Flash(flash) => Some((flash.position, flash.radius)),
            _ => None,
        });
        assert_eq!(flash, Some((caster, MAGE_SPECIAL_FLASH_RADIUS)));
    }
}
