//! Gameplay domain: the snake, enemies, combat, attacks, progression and spawning.

pub mod arena;
pub mod attacks;
pub mod collectibles;
pub mod combat;
pub mod enemies;
pub mod fx;
mod hud;
pub mod progression;
pub mod session;
pub mod snake;
pub mod status;

use bevy::prelude::*;

// === Shared Components ===

/// Hit points for any damageable entity.
///
/// Damage only ever lowers `current`. `current <= 0` means the entity is defeated
/// and waiting for removal; further damage is ignored.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Fill ratio in `[0, 1]` for bars.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// One of the four grid directions a chain segment can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Facing {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Facing {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Grid step for one tick in this direction.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::Up => IVec2::new(0, 1),
            Self::Down => IVec2::new(0, -1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
        }
    }

    /// Unit vector in world space.
    #[must_use]
    pub fn vector(self) -> Vec2 {
        self.offset().as_vec2()
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Grid cell occupied by a chain segment.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub struct GridPos(pub IVec2);

/// Direction a chain segment moved in on its last tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct Heading(pub Facing);

/// Base sprite color, restored after a hit flash.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Tint(pub Color);

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Health>()
        .register_type::<GridPos>()
        .register_type::<Heading>()
        .register_type::<Tint>();

    app.add_plugins((
        session::plugin,
        progression::plugin,
        arena::plugin,
        snake::plugin,
        enemies::plugin,
        status::plugin,
        combat::plugin,
        attacks::plugin,
        collectibles::plugin,
        fx::plugin,
        hud::plugin,
    ));
}
