//! Collectibles: the single pickup that grows the chain and roaming engineers.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::Z_PICKUP;
use crate::gameplay::arena::{ARENA_HEIGHT, ARENA_WIDTH, TILE_SIZE, cell_to_world, random_cell};
use crate::gameplay::attacks::engineer::EngineerClass;
use crate::gameplay::combat::CONTACT_RADIUS;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::progression::{Progress, Reward};
use crate::gameplay::session::GameRng;
use crate::gameplay::snake::{Chain, Follower, Player, Segment, append_slot, spawn_follower};
use crate::gameplay::{GridPos, Heading};
use crate::screens::GameState;
use crate::theme::palette;
use crate::third_party::within_radius;
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const PICKUP_SCORE: u32 = 10;
pub const PICKUP_EXPERIENCE: u32 = 10;
pub const ENGINEER_EXPERIENCE: u32 = 20;

pub const ENGINEER_SPAWN_INTERVAL: f32 = 10.0;
/// Uncollected engineers leave after this long.
pub const ENGINEER_LIFETIME_SECS: f32 = 20.0;
/// Minimum distance from any segment, enemy or other engineer at spawn.
pub const ENGINEER_CLEARANCE: f32 = TILE_SIZE * 2.0;
pub const ENGINEER_WANDER_SPEED: f32 = 20.0;

/// Cell rolls per spawn before giving up until the next attempt.
pub const MAX_SPAWN_ATTEMPTS: usize = 256;

const PICKUP_SIZE: f32 = TILE_SIZE * 0.5;
const ENGINEER_SIZE: f32 = TILE_SIZE * 0.7;

// === Components ===

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Pickup;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Engineer {
    pub class: EngineerClass,
    pub expires: Timer,
}

// === Resources ===

#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct EngineerSpawnTimer(pub Timer);

impl Default for EngineerSpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            ENGINEER_SPAWN_INTERVAL,
            TimerMode::Repeating,
        ))
    }
}

// === Helpers ===

/// Rolls random cells until `is_free` accepts one, at most [`MAX_SPAWN_ATTEMPTS`] times.
pub fn find_free_cell(rng: &mut impl Rng, is_free: impl Fn(IVec2) -> bool) -> Option<IVec2> {
    (0..MAX_SPAWN_ATTEMPTS)
        .map(|_| random_cell(rng))
        .find(|&cell| is_free(cell))
}

pub fn spawn_pickup(commands: &mut Commands, cell: IVec2) -> Entity {
    commands
        .spawn((
            Name::new("Pickup"),
            Pickup,
            GridPos(cell),
            Sprite::from_color(palette::PICKUP, Vec2::splat(PICKUP_SIZE)),
            Transform::from_translation(cell_to_world(cell).extend(Z_PICKUP)),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

pub fn spawn_engineer(
    commands: &mut Commands,
    position: Vec2,
    class: EngineerClass,
    rng: &mut impl Rng,
) -> Entity {
    let heading = Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU));
    commands
        .spawn((
            Name::new(format!("Engineer ({})", class.display_name())),
            Engineer {
                class,
                expires: Timer::from_seconds(ENGINEER_LIFETIME_SECS, TimerMode::Once),
            },
            RigidBody::Kinematic,
            LinearVelocity(heading * ENGINEER_WANDER_SPEED),
            Sprite::from_color(class.color(), Vec2::splat(ENGINEER_SIZE)),
            Transform::from_translation(position.extend(Z_PICKUP)),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

// === Systems ===

fn reset_engineer_spawn_timer(mut commands: Commands) {
    commands.insert_resource(EngineerSpawnTimer::default());
}

/// Keeps exactly one pickup on a cell the chain does not occupy.
fn ensure_pickup(
    mut commands: Commands,
    mut rng: ResMut<GameRng>,
    pickups: Query<(), With<Pickup>>,
    segments: Query<&GridPos, Or<(With<Player>, With<Follower>)>>,
) {
    if !pickups.is_empty() {
        return;
    }
    let occupied: Vec<IVec2> = segments.iter().map(|pos| pos.0).collect();
    match find_free_cell(&mut rng.0, |cell| !occupied.contains(&cell)) {
        Some(cell) => {
            spawn_pickup(&mut commands, cell);
        }
        None => debug!("no free cell for a pickup, retrying next frame"),
    }
}

fn tick_engineer_spawner(
    time: Res<Time>,
    mut spawn_timer: ResMut<EngineerSpawnTimer>,
    mut rng: ResMut<GameRng>,
    mut commands: Commands,
    blockers: Query<&Transform, Or<(With<Player>, With<Follower>, With<Enemy>, With<Engineer>)>>,
) {
    if !spawn_timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let taken: Vec<Vec2> = blockers.iter().map(|t| t.translation.truncate()).collect();
    let is_clear = |cell: IVec2| {
        let position = cell_to_world(cell);
        taken
            .iter()
            .all(|&other| !within_radius(position, other, ENGINEER_CLEARANCE))
    };
    let Some(cell) = find_free_cell(&mut rng.0, is_clear) else {
        debug!("no clear cell for an engineer, skipping this wave");
        return;
    };
    let class = EngineerClass::random(&mut rng.0);
    spawn_engineer(&mut commands, cell_to_world(cell), class, &mut rng.0);
}

/// Turns engineers back when they reach the arena edge.
fn wander_engineers(mut engineers: Query<(&Transform, &mut LinearVelocity), With<Engineer>>) {
    let half = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) / 2.0 - ENGINEER_SIZE / 2.0;
    for (transform, mut velocity) in &mut engineers {
        let position = transform.translation.truncate();
        if position.x.abs() >= half.x && position.x.signum() == velocity.x.signum() {
            velocity.x = -velocity.x;
        }
        if position.y.abs() >= half.y && position.y.signum() == velocity.y.signum() {
            velocity.y = -velocity.y;
        }
    }
}

fn expire_engineers(
    time: Res<Time>,
    mut commands: Commands,
    mut engineers: Query<(Entity, &mut Engineer)>,
) {
    for (entity, mut engineer) in &mut engineers {
        if engineer.expires.tick(time.delta()).is_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}

/// Where the next follower goes. Several appends in one frame line up behind each other.
fn next_slot(tail: &mut Option<Segment>, chain: &Chain, head: Segment) -> Segment {
    let slot = tail.map_or_else(
        || append_slot(chain, head),
        |last| Segment {
            cell: last.cell - last.facing.offset(),
            facing: last.facing,
        },
    );
    *tail = Some(slot);
    slot
}

fn collect(
    mut commands: Commands,
    player: Single<(&Transform, &GridPos, &Heading), With<Player>>,
    pickups: Query<(Entity, &Transform), With<Pickup>>,
    engineers: Query<(Entity, &Transform, &Engineer)>,
    mut chain: ResMut<Chain>,
    progress: Res<Progress>,
    mut rewards: MessageWriter<Reward>,
) {
    let (transform, grid, heading) = *player;
    let head_position = transform.translation.truncate();
    let head = Segment {
        cell: grid.0,
        facing: heading.0,
    };
    // Slot of the follower appended earlier this frame, if any.
    let mut tail: Option<Segment> = None;

    for (entity, pickup_transform) in &pickups {
        if !within_radius(head_position, pickup_transform.translation.truncate(), CONTACT_RADIUS) {
            continue;
        }
        commands.entity(entity).try_despawn();
        let slot = next_slot(&mut tail, &chain, head);
        spawn_follower(&mut commands, &mut chain, slot, None, progress.level);
        rewards.write(Reward {
            score: PICKUP_SCORE,
            experience: PICKUP_EXPERIENCE,
        });
    }

    for (entity, engineer_transform, engineer) in &engineers {
        let position = engineer_transform.translation.truncate();
        if !within_radius(head_position, position, CONTACT_RADIUS) {
            continue;
        }
        commands.entity(entity).try_despawn();
        let slot = next_slot(&mut tail, &chain, head);
        spawn_follower(&mut commands, &mut chain, slot, Some(engineer.class), progress.level);
        rewards.write(Reward {
            score: 0,
            experience: ENGINEER_EXPERIENCE,
        });
        info!(class = engineer.class.display_name(), "engineer joined the chain");
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Pickup>()
        .register_type::<Engineer>()
        .register_type::<EngineerSpawnTimer>();
    app.init_resource::<EngineerSpawnTimer>();

    app.add_systems(OnEnter(GameState::InGame), reset_engineer_spawn_timer);
    app.add_systems(
        Update,
        (
            (ensure_pickup, tick_engineer_spawner, expire_engineers).in_set(GameSet::Spawn),
            wander_engineers.in_set(GameSet::Movement),
            collect.in_set(GameSet::Collision),
        )
            .run_if(gameplay_running),
    );
}
