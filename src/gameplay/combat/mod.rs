//! Combat: damage resolution, body contact, projectiles and health bars.

pub mod contact;
pub mod damage;
pub mod health_bar;
pub mod projectile;

use bevy::prelude::*;

pub use contact::{CONTACT_RADIUS, ContactDebounce};
pub use damage::{DamageMessage, DamageNumber, Defeated, HitFlash};
pub use projectile::{Projectile, ProjectileSpec, spawn_projectile};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        damage::plugin,
        contact::plugin,
        projectile::plugin,
        health_bar::plugin,
    ));
}
