//! Staged engineer effects that outlive the attack that placed them.
//!
//! Each hazard owns its timers and resolves any entity it refers to every frame.
//! A missing anchor or target ends the hazard quietly.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::{AttackPlan, AttackSink, Effect, EnemySnapshot, falloff, within};
use crate::Z_PICKUP;
use crate::gameplay::arena::TILE_SIZE;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::fx::AreaFlash;
use crate::gameplay::status::StatusKind;
use crate::screens::GameState;
use crate::theme::palette;
use crate::{GameSet, Z_PROJECTILE, gameplay_running};

// === Constants ===

pub const ICE_RING_RADIUS: f32 = TILE_SIZE * 4.0;
pub const ICE_RING_SECS: f32 = 0.6;
pub const ICE_RING_DAMAGE: f32 = 1.0;
pub const ICE_RING_FREEZE_SECS: f32 = 2.0;

pub const HOLY_FIELD_RADIUS: f32 = TILE_SIZE * 3.0;
pub const HOLY_FIELD_PULSE_SECS: f32 = 0.5;
pub const HOLY_FIELD_PULSES: u32 = 6;
pub const HOLY_FIELD_DAMAGE: f32 = 1.0;

pub const SNIPER_TELEGRAPH_SECS: f32 = 0.3;
pub const SNIPER_SHOT_SPEED: f32 = 900.0;
pub const SNIPER_DAMAGE: f32 = 6.0;
pub const SNIPER_KNOCKBACK: f32 = 30.0;

pub const MUSHROOM_FUSE_SECS: f32 = 1.5;
pub const MUSHROOM_RADIUS: f32 = TILE_SIZE * 2.5;
pub const MUSHROOM_DAMAGE: f32 = 3.0;

pub const MINE_ARM_SECS: f32 = 0.5;
pub const MINE_LIFETIME_SECS: f32 = 10.0;
pub const MINE_TRIGGER_RADIUS: f32 = TILE_SIZE;
pub const MINE_BLAST_RADIUS: f32 = TILE_SIZE * 2.0;
pub const MINE_DAMAGE: f32 = 4.0;
pub const MINE_KNOCKBACK: f32 = 20.0;

pub const POISON_CLOUD_RADIUS: f32 = TILE_SIZE * 2.0;
pub const POISON_CLOUD_SECS: f32 = 4.0;
pub const POISON_CLOUD_PULSE_SECS: f32 = 0.5;
pub const POISON_CLOUD_DAMAGE: f32 = 1.0;

/// Damage at the blast edge relative to the center, for mushrooms and mines.
pub const BLAST_MIN_FALLOFF: f32 = 0.5;

const MARKER_SIZE: f32 = TILE_SIZE * 0.5;

// === Types ===

/// A hazard an engineer places. Turned into an entity by [`spawn_hazard`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hazard {
    IceRing { origin: Vec2 },
    HolyField { anchor: Entity },
    SniperMark { target: Entity, origin: Vec2 },
    Mushroom { position: Vec2 },
    Mine { position: Vec2 },
    PoisonCloud { position: Vec2 },
}

// === Components ===

/// Expanding ring; each enemy it reaches is hit once.
#[derive(Component, Debug, Clone)]
pub struct IceRing {
    pub timer: Timer,
    pub hit: HashSet<Entity>,
}

/// Pulsing field that follows its anchor.
#[derive(Component, Debug, Clone)]
pub struct HolyField {
    pub anchor: Entity,
    pub pulse: Timer,
    pub pulses_left: u32,
}

/// Telegraph before a sniper shot.
#[derive(Component, Debug, Clone)]
pub struct SniperMark {
    pub target: Entity,
    pub telegraph: Timer,
}

/// Homes on its target every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct SniperShot {
    pub target: Entity,
}

#[derive(Component, Debug, Clone)]
pub struct Mushroom {
    pub fuse: Timer,
}

#[derive(Component, Debug, Clone)]
pub struct Mine {
    pub arming: Timer,
    pub lifetime: Timer,
}

impl Mine {
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.arming.is_finished()
    }
}

#[derive(Component, Debug, Clone)]
pub struct PoisonCloud {
    pub pulse: Timer,
    pub lifetime: Timer,
}

// === Spawning ===

pub fn spawn_hazard(commands: &mut Commands, hazard: Hazard) -> Entity {
    let marker = |color: Color, size: f32, position: Vec2| {
        (
            Sprite::from_color(color, Vec2::splat(size)),
            Transform::from_translation(position.extend(Z_PICKUP)),
            DespawnOnExit(GameState::InGame),
        )
    };

    match hazard {
        Hazard::IceRing { origin } => commands
            .spawn((
                Name::new("Ice Ring"),
                IceRing {
                    timer: Timer::from_seconds(ICE_RING_SECS, TimerMode::Once),
                    hit: HashSet::default(),
                },
                marker(palette::ICE_RING, 1.0, origin),
            ))
            .id(),
        Hazard::HolyField { anchor } => commands
            .spawn((
                Name::new("Holy Field"),
                HolyField {
                    anchor,
                    pulse: Timer::from_seconds(HOLY_FIELD_PULSE_SECS, TimerMode::Repeating),
                    pulses_left: HOLY_FIELD_PULSES,
                },
                marker(palette::HOLY_FIELD, HOLY_FIELD_RADIUS * 2.0, Vec2::ZERO),
                // Shown once it has caught up with its anchor.
                Visibility::Hidden,
            ))
            .id(),
        Hazard::SniperMark { target, origin } => commands
            .spawn((
                Name::new("Sniper Mark"),
                SniperMark {
                    target,
                    telegraph: Timer::from_seconds(SNIPER_TELEGRAPH_SECS, TimerMode::Once),
                },
                marker(palette::SNIPER_MARK, MARKER_SIZE, origin),
            ))
            .id(),
        Hazard::Mushroom { position } => commands
            .spawn((
                Name::new("Mushroom"),
                Mushroom {
                    fuse: Timer::from_seconds(MUSHROOM_FUSE_SECS, TimerMode::Once),
                },
                marker(palette::MUSHROOM, MARKER_SIZE, position),
            ))
            .id(),
        Hazard::Mine { position } => commands
            .spawn((
                Name::new("Mine"),
                Mine {
                    arming: Timer::from_seconds(MINE_ARM_SECS, TimerMode::Once),
                    lifetime: Timer::from_seconds(MINE_LIFETIME_SECS, TimerMode::Once),
                },
                marker(palette::MINE, MARKER_SIZE, position),
            ))
            .id(),
        Hazard::PoisonCloud { position } => commands
            .spawn((
                Name::new("Poison Cloud"),
                PoisonCloud {
                    pulse: Timer::from_seconds(POISON_CLOUD_PULSE_SECS, TimerMode::Repeating),
                    lifetime: Timer::from_seconds(POISON_CLOUD_SECS, TimerMode::Once),
                },
                marker(palette::POISON_CLOUD, POISON_CLOUD_RADIUS * 2.0, position),
            ))
            .id(),
    }
}

/// Falloff damage to every enemy within `radius` of `center`.
fn blast(
    enemies: &[EnemySnapshot],
    center: Vec2,
    radius: f32,
    damage: f32,
    color: Color,
) -> AttackPlan {
    let mut plan = AttackPlan::default();
    for enemy in within(enemies, center, radius) {
        let scale = falloff(enemy.position.distance(center), radius, BLAST_MIN_FALLOFF);
        plan.push(Effect::Damage {
            target: enemy.entity,
            amount: damage * scale,
        });
    }
    plan.push(Effect::Flash(AreaFlash {
        position: center,
        radius,
        color,
    }));
    plan
}

// === Systems ===

fn expand_ice_rings(
    time: Res<Time>,
    mut commands: Commands,
    mut rings: Query<(Entity, &mut IceRing, &mut Transform), Without<Enemy>>,
    mut sink: AttackSink,
) {
    for (entity, mut ring, mut transform) in &mut rings {
        ring.timer.tick(time.delta());
        let radius = ICE_RING_RADIUS * ring.timer.fraction();
        transform.scale = Vec3::new(radius * 2.0, radius * 2.0, 1.0);

        let center = transform.translation.truncate();
        let mut plan = AttackPlan::default();
        for enemy in within(&sink.snapshot(), center, radius) {
            if !ring.hit.insert(enemy.entity) {
                continue;
            }
            plan.push(Effect::Damage {
                target: enemy.entity,
                amount: ICE_RING_DAMAGE,
            });
            plan.push(Effect::Status {
                target: enemy.entity,
                status: StatusKind::Freeze {
                    secs: ICE_RING_FREEZE_SECS,
                },
            });
        }
        sink.apply(plan);

        if ring.timer.is_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}

fn pulse_holy_fields(
    time: Res<Time>,
    mut commands: Commands,
    mut fields: Query<
        (Entity, &mut HolyField, &mut Transform, &mut Visibility),
        Without<Enemy>,
    >,
    anchors: Query<&Transform, (Without<HolyField>, Without<Enemy>)>,
    mut sink: AttackSink,
) {
    for (entity, mut field, mut transform, mut visibility) in &mut fields {
        let Ok(anchor) = anchors.get(field.anchor) else {
            commands.entity(entity).try_despawn();
            continue;
        };
        let center = anchor.translation.truncate();
        transform.translation = center.extend(Z_PICKUP);
        *visibility = Visibility::Inherited;

        let due = field
            .pulse
            .tick(time.delta())
            .times_finished_this_tick()
            .min(field.pulses_left);
        for _ in 0..due {
            let mut plan = AttackPlan::default();
            for enemy in within(&sink.snapshot(), center, HOLY_FIELD_RADIUS) {
                plan.push(Effect::Damage {
                    target: enemy.entity,
                    amount: HOLY_FIELD_DAMAGE,
                });
            }
            sink.apply(plan);
        }
        field.pulses_left -= due;
        if field.pulses_left == 0 {
            commands.entity(entity).try_despawn();
        }
    }
}

fn resolve_sniper_marks(
    time: Res<Time>,
    mut commands: Commands,
    mut marks: Query<(Entity, &mut SniperMark, &Transform), Without<Enemy>>,
    sink: AttackSink,
) {
    for (entity, mut mark, transform) in &mut marks {
        if sink.position_of(mark.target).is_none() {
            commands.entity(entity).try_despawn();
            continue;
        }
        if !mark.telegraph.tick(time.delta()).is_finished() {
            continue;
        }
        commands.entity(entity).try_despawn();
        commands.spawn((
            Name::new("Sniper Shot"),
            SniperShot {
                target: mark.target,
            },
            Sprite::from_color(palette::SNIPER_MARK, Vec2::splat(MARKER_SIZE / 2.0)),
            Transform::from_translation(transform.translation.truncate().extend(Z_PROJECTILE)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn move_sniper_shots(
    time: Res<Time>,
    mut commands: Commands,
    mut shots: Query<(Entity, &SniperShot, &mut Transform), Without<Enemy>>,
    mut sink: AttackSink,
) {
    for (entity, shot, mut transform) in &mut shots {
        let Some(target) = sink.position_of(shot.target) else {
            commands.entity(entity).try_despawn();
            continue;
        };

        let current = transform.translation.truncate();
        let distance = current.distance(target);
        let step = SNIPER_SHOT_SPEED * time.delta_secs();
        if step < distance {
            let next = current.move_towards(target, step);
            transform.translation = next.extend(transform.translation.z);
            continue;
        }

        let mut plan = AttackPlan::default();
        plan.push(Effect::Damage {
            target: shot.target,
            amount: SNIPER_DAMAGE,
        });
        plan.push(Effect::Knockback {
            target: shot.target,
            from: current,
            distance: SNIPER_KNOCKBACK,
        });
        sink.apply(plan);
        commands.entity(entity).try_despawn();
    }
}

fn detonate_mushrooms(
    time: Res<Time>,
    mut commands: Commands,
    mut mushrooms: Query<(Entity, &mut Mushroom, &Transform), Without<Enemy>>,
    mut sink: AttackSink,
) {
    for (entity, mut mushroom, transform) in &mut mushrooms {
        if !mushroom.fuse.tick(time.delta()).is_finished() {
            continue;
        }
        let center = transform.translation.truncate();
        let enemies = sink.snapshot();
        let mut plan = blast(&enemies, center, MUSHROOM_RADIUS, MUSHROOM_DAMAGE, palette::MUSHROOM);
        for enemy in within(&enemies, center, MUSHROOM_RADIUS) {
            plan.push(Effect::Status {
                target: enemy.entity,
                status: StatusKind::Poison,
            });
        }
        sink.apply(plan);
        commands.entity(entity).try_despawn();
    }
}

fn trigger_mines(
    time: Res<Time>,
    mut commands: Commands,
    mut mines: Query<(Entity, &mut Mine, &Transform), Without<Enemy>>,
    mut sink: AttackSink,
) {
    for (entity, mut mine, transform) in &mut mines {
        mine.arming.tick(time.delta());
        if mine.lifetime.tick(time.delta()).is_finished() {
            commands.entity(entity).try_despawn();
            continue;
        }
        if !mine.is_armed() {
            continue;
        }

        let center = transform.translation.truncate();
        let enemies = sink.snapshot();
        if within(&enemies, center, MINE_TRIGGER_RADIUS).next().is_none() {
            continue;
        }
        let mut plan = blast(&enemies, center, MINE_BLAST_RADIUS, MINE_DAMAGE, palette::MINE);
        for enemy in within(&enemies, center, MINE_BLAST_RADIUS) {
            plan.push(Effect::Knockback {
                target: enemy.entity,
                from: center,
                distance: MINE_KNOCKBACK,
            });
        }
        sink.apply(plan);
        commands.entity(entity).try_despawn();
    }
}

fn pulse_poison_clouds(
    time: Res<Time>,
    mut commands: Commands,
    mut clouds: Query<(Entity, &mut PoisonCloud, &Transform), Without<Enemy>>,
    mut sink: AttackSink,
) {
    for (entity, mut cloud, transform) in &mut clouds {
        let center = transform.translation.truncate();
        let due = cloud.pulse.tick(time.delta()).times_finished_this_tick();
        for _ in 0..due {
            let mut plan = AttackPlan::default();
            for enemy in within(&sink.snapshot(), center, POISON_CLOUD_RADIUS) {
                plan.push(Effect::Damage {
                    target: enemy.entity,
                    amount: POISON_CLOUD_DAMAGE,
                });
                plan.push(Effect::Status {
                    target: enemy.entity,
                    status: StatusKind::Poison,
                });
            }
            sink.apply(plan);
        }
        if cloud.lifetime.tick(time.delta()).is_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            expand_ice_rings,
            pulse_holy_fields,
            resolve_sniper_marks,
            move_sniper_shots,
            detonate_mushrooms,
            trigger_mines,
            pulse_poison_clouds,
        )
            .chain()
            .in_set(GameSet::Attack)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::Health;
    use crate::gameplay::combat::DamageMessage;
    use crate::gameplay::fx::BeamFlash;
    use crate::gameplay::status::StatusEffects;
    use crate::testing::{Captured, advance_and_update, assert_entity_count, create_base_test_app};
    use bevy::ecs::system::RunSystemOnce;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_hazard_test_app() -> App {
        let mut app = create_base_test_app();
        app.add_message::<AreaFlash>().add_message::<BeamFlash>();
        Captured::<DamageMessage>::install(&mut app);
        app.add_systems(
            Update,
            (
                expand_ice_rings,
                pulse_holy_fields,
                resolve_sniper_marks,
                move_sniper_shots,
                detonate_mushrooms,
                trigger_mines,
                pulse_poison_clouds,
            )
                .chain(),
        );
        app.update();
        app
    }

    fn place(app: &mut App, hazard: Hazard) -> Entity {
        app.world_mut()
            .run_system_once(move |mut commands: Commands| spawn_hazard(&mut commands, hazard))
            .expect("hazard spawn should run")
    }

    fn spawn_enemy(app: &mut App, position: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Enemy { score_value: 5 },
                Health::new(10.0),
                StatusEffects::default(),
                Transform::from_translation(position.extend(0.0)),
            ))
            .id()
    }

    fn damage_to(app: &App, target: Entity) -> Vec<f32> {
        app.world()
            .resource::<Captured<DamageMessage>>()
            .0
            .iter()
            .filter(|m| m.target == target)
            .map(|m| m.amount)
            .collect()
    }

    fn step(app: &mut App, millis: u64, times: usize) {
        for _ in 0..times {
            advance_and_update(app, Duration::from_millis(millis));
        }
    }

    #[test]
    fn ice_ring_hits_each_enemy_once_as_it_grows() {
        let mut app = create_hazard_test_app();
        let near = spawn_enemy(&mut app, Vec2::new(TILE_SIZE, 0.0));
        let mid = spawn_enemy(&mut app, Vec2::new(TILE_SIZE * 3.0, 0.0));
        let far = spawn_enemy(&mut app, Vec2::new(TILE_SIZE * 6.0, 0.0));
        let ring = place(&mut app, Hazard::IceRing { origin: Vec2::ZERO });

        step(&mut app, 300, 1);
        assert_eq!(damage_to(&app, near).len(), 1);
        assert!(damage_to(&app, mid).is_empty());

        step(&mut app, 300, 2);
        assert_eq!(damage_to(&app, near).len(), 1);
        assert_eq!(damage_to(&app, mid).len(), 1);
        assert!(damage_to(&app, far).is_empty());
        assert!(app.world().get_entity(ring).is_err());

        let frozen = app
            .world()
            .get::<StatusEffects>(mid)
            .is_some_and(StatusEffects::is_frozen);
        assert!(frozen);
    }

    #[test]
    fn holy_field_pulses_six_times_then_ends() {
        let mut app = create_hazard_test_app();
        let bard = app.world_mut().spawn(Transform::default()).id();
        let enemy = spawn_enemy(&mut app, Vec2::new(50.0, 0.0));
        place(&mut app, Hazard::HolyField { anchor: bard });

        step(&mut app, 500, 8);

        assert_eq!(damage_to(&app, enemy).len(), HOLY_FIELD_PULSES as usize);
        assert_entity_count::<With<HolyField>>(&mut app, 0);
    }

    #[test]
    fn holy_field_ends_with_its_anchor() {
        let mut app = create_hazard_test_app();
        let bard = app.world_mut().spawn(Transform::default()).id();
        let enemy = spawn_enemy(&mut app, Vec2::new(50.0, 0.0));
        place(&mut app, Hazard::HolyField { anchor: bard });
        step(&mut app, 500, 1);

        app.world_mut().despawn(bard);
        step(&mut app, 500, 3);

        assert_eq!(damage_to(&app, enemy).len(), 1);
        assert_entity_count::<With<HolyField>>(&mut app, 0);
    }

    #[test]
    fn sniper_shot_lands_after_telegraph() {
        let mut app = create_hazard_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(200.0, 0.0));
        place(
            &mut app,
            Hazard::SniperMark {
                target: enemy,
                origin: Vec2::ZERO,
            },
        );

        step(&mut app, 200, 1);
        assert_entity_count::<With<SniperShot>>(&mut app, 0);
        step(&mut app, 200, 1);
        assert_entity_count::<With<SniperShot>>(&mut app, 1);
        assert!(damage_to(&app, enemy).is_empty());

        step(&mut app, 100, 3);
        assert_eq!(damage_to(&app, enemy), vec![SNIPER_DAMAGE]);
        assert_entity_count::<With<SniperShot>>(&mut app, 0);
        let x = app
            .world()
            .get::<Transform>(enemy)
            .map_or(0.0, |t| t.translation.x);
        assert!((x - (200.0 + SNIPER_KNOCKBACK)).abs() < 1.0);
    }

    #[test]
    fn sniper_mark_fizzles_when_target_is_gone() {
        let mut app = create_hazard_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(200.0, 0.0));
        place(
            &mut app,
            Hazard::SniperMark {
                target: enemy,
                origin: Vec2::ZERO,
            },
        );
        step(&mut app, 200, 1);
        app.world_mut().despawn(enemy);

        step(&mut app, 100, 3);

        assert!(app.world().resource::<Captured<DamageMessage>>().0.is_empty());
        assert_entity_count::<Or<(With<SniperMark>, With<SniperShot>)>>(&mut app, 0);
    }

    #[test]
    fn sniper_shot_in_flight_fizzles_when_target_is_gone() {
        let mut app = create_hazard_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(800.0, 0.0));
        place(
            &mut app,
            Hazard::SniperMark {
                target: enemy,
                origin: Vec2::ZERO,
            },
        );
        step(&mut app, 400, 1);
        assert_entity_count::<With<SniperShot>>(&mut app, 1);

        app.world_mut().despawn(enemy);
        step(&mut app, 100, 1);

        assert!(app.world().resource::<Captured<DamageMessage>>().0.is_empty());
        assert_entity_count::<With<SniperShot>>(&mut app, 0);
    }

    #[test]
    fn mushroom_bursts_after_fuse_with_falloff_and_poison() {
        let mut app = create_hazard_test_app();
        let center = spawn_enemy(&mut app, Vec2::ZERO);
        let edge = spawn_enemy(&mut app, Vec2::new(MUSHROOM_RADIUS, 0.0));
        place(&mut app, Hazard::Mushroom { position: Vec2::ZERO });

        step(&mut app, 1000, 1);
        assert!(damage_to(&app, center).is_empty());
        step(&mut app, 500, 1);

        assert_eq!(damage_to(&app, center), vec![MUSHROOM_DAMAGE]);
        let edge_hits = damage_to(&app, edge);
        assert_eq!(edge_hits.len(), 1);
        assert!((edge_hits[0] - MUSHROOM_DAMAGE * BLAST_MIN_FALLOFF).abs() < 1e-4);
        let poisoned = app
            .world()
            .get::<StatusEffects>(edge)
            .is_some_and(|effects| effects.poisoned.is_some());
        assert!(poisoned);
    }

    #[test]
    fn mine_waits_until_armed() {
        let mut app = create_hazard_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(10.0, 0.0));
        place(&mut app, Hazard::Mine { position: Vec2::ZERO });

        step(&mut app, 200, 1);
        assert!(damage_to(&app, enemy).is_empty());
        assert_entity_count::<With<Mine>>(&mut app, 1);

        step(&mut app, 400, 1);
        assert_eq!(damage_to(&app, enemy).len(), 1);
        assert_entity_count::<With<Mine>>(&mut app, 0);
    }

    #[test]
    fn unused_mine_expires() {
        let mut app = create_hazard_test_app();
        spawn_enemy(&mut app, Vec2::new(500.0, 0.0));
        place(&mut app, Hazard::Mine { position: Vec2::ZERO });

        step(&mut app, 1000, 9);
        assert_entity_count::<With<Mine>>(&mut app, 1);
        step(&mut app, 1000, 1);
        assert_entity_count::<With<Mine>>(&mut app, 0);
    }

    #[test]
    fn poison_cloud_pulses_for_its_lifetime() {
        let mut app = create_hazard_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(20.0, 0.0));
        place(&mut app, Hazard::PoisonCloud { position: Vec2::ZERO });

        step(&mut app, 500, 10);

        assert_eq!(damage_to(&app, enemy).len(), 8);
        assert_entity_count::<With<PoisonCloud>>(&mut app, 0);
        let slowed = app
            .world()
            .get::<StatusEffects>(enemy)
            .is_some_and(|effects| effects.poisoned.is_some() && effects.poison_slow.is_some());
        assert!(slowed);
    }
}
