//! Avian2d physics configuration for top-down gameplay.
//!
//! Gameplay asks physics two things: "move this body toward that point at speed S"
//! and "are these two points within radius R". Game systems call the wrappers below
//! instead of avian directly; if the physics engine changes, only this file changes.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::arena::TILE_SIZE;

// === Helpers ===

/// Velocity that carries a body from `from` straight toward `to` at `speed`.
///
/// Returns zero when the points coincide or the speed is not positive.
#[must_use]
pub fn home_toward(from: Vec2, to: Vec2, speed: f32) -> LinearVelocity {
    if speed <= 0.0 {
        return LinearVelocity::ZERO;
    }
    LinearVelocity((to - from).normalize_or_zero() * speed)
}

/// Center-to-center proximity test used for every overlap check in the game.
#[must_use]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default().with_length_unit(TILE_SIZE));
    app.insert_resource(Gravity::ZERO);
}
