//! Enemy body contact against the head and followers.

use std::time::Duration;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::damage::DamageMessage;
use crate::gameplay::arena::TILE_SIZE;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::snake::{Follower, Player};
use crate::third_party::within_radius;
use crate::{GameSet, gameplay_running};

/// Overlap distance for body contact and collecting.
pub const CONTACT_RADIUS: f32 = TILE_SIZE / 2.0;

pub const CONTACT_DAMAGE: f32 = 1.0;

/// Minimum time between two hits from one enemy on the same target.
pub const CONTACT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Per-target debounce timers of one enemy.
#[derive(Component, Debug, Clone, Default)]
pub struct ContactDebounce {
    cooling: HashMap<Entity, Timer>,
}

impl ContactDebounce {
    /// Returns `true` and starts the debounce if `target` may be hit now.
    pub fn try_hit(&mut self, target: Entity) -> bool {
        if self.is_cooling(target) {
            return false;
        }
        self.cooling
            .insert(target, Timer::new(CONTACT_DEBOUNCE, TimerMode::Once));
        true
    }

    pub fn tick(&mut self, delta: Duration) {
        self.cooling
            .retain(|_, timer| !timer.tick(delta).is_finished());
    }

    #[must_use]
    pub fn is_cooling(&self, target: Entity) -> bool {
        self.cooling.contains_key(&target)
    }
}

fn enemy_contact(
    time: Res<Time>,
    mut enemies: Query<(&Transform, &mut ContactDebounce), With<Enemy>>,
    segments: Query<(Entity, &Transform), (Or<(With<Player>, With<Follower>)>, Without<Enemy>)>,
    mut damage: MessageWriter<DamageMessage>,
) {
    for (enemy_transform, mut debounce) in &mut enemies {
        debounce.tick(time.delta());
        let enemy_pos = enemy_transform.translation.truncate();
        for (target, target_transform) in &segments {
            if within_radius(enemy_pos, target_transform.translation.truncate(), CONTACT_RADIUS)
                && debounce.try_hit(target)
            {
                damage.write(DamageMessage::new(target, CONTACT_DAMAGE));
            }
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        enemy_contact
            .in_set(GameSet::Collision)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_blocks_until_expiry() {
        let mut debounce = ContactDebounce::default();
        let target = Entity::PLACEHOLDER;

        assert!(debounce.try_hit(target));
        assert!(!debounce.try_hit(target));
        debounce.tick(Duration::from_millis(499));
        assert!(debounce.is_cooling(target));
        debounce.tick(Duration::from_millis(1));
        assert!(debounce.try_hit(target));
    }
}
