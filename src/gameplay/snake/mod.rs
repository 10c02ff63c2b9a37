//! The player's chain: the head and the followers trailing it.

mod input;
pub mod movement;

pub use input::{HeroInput, Steering};
pub use movement::{MoveTimer, Segment, head_collides, step_chain};

use bevy::prelude::*;

use crate::Z_SNAKE;
use crate::gameplay::arena::{CENTER_CELL, TILE_SIZE, cell_to_world};
use crate::gameplay::attacks::engineer::{EngineerClass, engineer_cooldown_secs};
use crate::gameplay::attacks::hero::{HeroClass, basic_cooldown_secs};
use crate::gameplay::attacks::{BasicCooldown, Cooldown, SpecialCooldown};
use crate::gameplay::combat::health_bar::HealthBarConfig;
use crate::gameplay::progression::Tuning;
use crate::gameplay::session::SessionConfig;
use crate::gameplay::{Facing, GridPos, Heading, Health, Tint};
use crate::screens::GameState;
use crate::theme::palette;

// === Constants ===

pub const PLAYER_HEALTH: f32 = 10.0;
pub const FOLLOWER_HEALTH: f32 = 3.0;

const SEGMENT_SIZE: f32 = TILE_SIZE - 4.0;

const SEGMENT_HEALTH_BAR: HealthBarConfig = HealthBarConfig {
    width: SEGMENT_SIZE,
    height: 3.0,
    y_offset: TILE_SIZE / 2.0 + 2.0,
};

// === Components ===

/// The head of the chain. Exactly one exists while in game.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player {
    pub hero: HeroClass,
}

/// A trailing chain segment. Classed followers also carry an [`EngineerClass`].
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Follower;

// === Resources ===

/// Follower entities in chain order, nearest the head first.
#[derive(Resource, Debug, Clone, Default)]
pub struct Chain {
    pub followers: Vec<Entity>,
    /// Slot the tail left on the last tick; new followers are appended here.
    pub vacated: Option<Segment>,
}

impl Chain {
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.followers.len();
        self.followers.retain(|&follower| follower != entity);
        self.followers.len() != before
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.followers.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }
}

// === Helpers ===

/// Sprite color for a follower; classed followers use their class tint.
#[must_use]
pub fn follower_color(class: Option<EngineerClass>) -> Color {
    class.map_or(palette::FOLLOWER, EngineerClass::color)
}

/// Spawns a follower in `slot` and appends it to the chain.
pub fn spawn_follower(
    commands: &mut Commands,
    chain: &mut Chain,
    slot: Segment,
    class: Option<EngineerClass>,
    level: u32,
) -> Entity {
    let color = follower_color(class);
    let mut follower = commands.spawn((
        Name::new("Follower"),
        Follower,
        GridPos(slot.cell),
        Heading(slot.facing),
        Health::new(FOLLOWER_HEALTH),
        SEGMENT_HEALTH_BAR,
        Tint(color),
        Sprite::from_color(color, Vec2::splat(SEGMENT_SIZE)),
        Transform::from_translation(cell_to_world(slot.cell).extend(Z_SNAKE)),
        DespawnOnExit(GameState::InGame),
    ));
    if let Some(class) = class {
        follower.insert((
            class,
            SpecialCooldown(Cooldown::new(engineer_cooldown_secs(class, level))),
        ));
    }
    let entity = follower.id();
    chain.followers.push(entity);
    entity
}

/// Slot behind the tail where the next follower goes.
#[must_use]
pub fn append_slot(chain: &Chain, head: Segment) -> Segment {
    chain.vacated.unwrap_or(Segment {
        cell: head.cell - head.facing.offset(),
        facing: head.facing,
    })
}

// === Systems ===

fn spawn_player(mut commands: Commands, config: Res<SessionConfig>) {
    let hero = config.hero;
    commands.insert_resource(Chain::default());

    commands.spawn((
        Name::new("Player"),
        Player { hero },
        GridPos(CENTER_CELL),
        Heading(Facing::Right),
        Health::new(PLAYER_HEALTH),
        SEGMENT_HEALTH_BAR,
        BasicCooldown(Cooldown::ready(basic_cooldown_secs(1))),
        SpecialCooldown(Cooldown::ready(Tuning::default().special_cooldown_secs())),
        Tint(hero.color()),
        Sprite::from_color(hero.color(), Vec2::splat(TILE_SIZE - 2.0)),
        Transform::from_translation(cell_to_world(CENTER_CELL).extend(Z_SNAKE + 0.1)),
        DespawnOnExit(GameState::InGame),
    ));
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>().register_type::<Follower>();
    app.init_resource::<Chain>();

    app.add_systems(OnEnter(GameState::InGame), spawn_player);
    app.add_plugins((input::plugin, movement::plugin));
}
