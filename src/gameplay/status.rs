//! Status effects on enemies: freeze, slow and poison, plus the derived move speed.

use std::time::Duration;

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;

use crate::gameplay::combat::damage::DamageMessage;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Interval between poison damage ticks.
pub const POISON_TICK_SECS: f32 = 1.0;

/// Number of damage ticks one poison application deals.
pub const POISON_TICKS: u32 = 3;

/// Damage per poison tick.
pub const POISON_DAMAGE: f32 = 1.0;

/// Multiplier applied to the poison slow on every application.
pub const POISON_SLOW_STEP: f32 = 0.7;

/// Poison slow never reduces speed below this factor.
pub const POISON_SLOW_FLOOR: f32 = 0.5;

// === Types ===

/// A status an attack can inflict.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum StatusKind {
    Freeze { secs: f32 },
    Slow { factor: f32, secs: f32 },
    Poison,
}

#[derive(Debug, Clone, Reflect)]
pub struct SlowEffect {
    pub factor: f32,
    pub timer: Timer,
}

#[derive(Debug, Clone, Reflect)]
pub struct PoisonEffect {
    pub tick: Timer,
    pub remaining: u32,
}

// === Components ===

/// All timed effects on one enemy.
///
/// Reapplying an active freeze, slow or poison is a no-op and does not refresh
/// its duration. Only the poison slow stacks, down to [`POISON_SLOW_FLOOR`].
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StatusEffects {
    pub frozen: Option<Timer>,
    pub slowed: Option<SlowEffect>,
    pub poisoned: Option<PoisonEffect>,
    pub poison_slow: Option<f32>,
}

impl StatusEffects {
    /// Returns `true` if the effect started (or, for poison, the slow stacked).
    pub fn apply(&mut self, kind: StatusKind) -> bool {
        match kind {
            StatusKind::Freeze { secs } => self.freeze(secs),
            StatusKind::Slow { factor, secs } => self.slow(factor, secs),
            StatusKind::Poison => {
                self.poison();
                true
            }
        }
    }

    pub fn freeze(&mut self, secs: f32) -> bool {
        if self.frozen.is_some() {
            return false;
        }
        self.frozen = Some(Timer::from_seconds(secs, TimerMode::Once));
        true
    }

    pub fn slow(&mut self, factor: f32, secs: f32) -> bool {
        if self.slowed.is_some() {
            return false;
        }
        self.slowed = Some(SlowEffect {
            factor,
            timer: Timer::from_seconds(secs, TimerMode::Once),
        });
        true
    }

    /// Stacks the poison slow and starts the damage-over-time if none is running.
    /// Returns whether a new damage-over-time started.
    pub fn poison(&mut self) -> bool {
        let stacked = self.poison_slow.unwrap_or(1.0) * POISON_SLOW_STEP;
        self.poison_slow = Some(stacked.max(POISON_SLOW_FLOOR));

        if self.poisoned.is_some() {
            return false;
        }
        self.poisoned = Some(PoisonEffect {
            tick: Timer::from_seconds(POISON_TICK_SECS, TimerMode::Repeating),
            remaining: POISON_TICKS,
        });
        true
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.frozen.is_none()
            && self.slowed.is_none()
            && self.poisoned.is_none()
            && self.poison_slow.is_none()
    }

    /// Multiplier on the original speed: 0 while frozen.
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        if self.is_frozen() {
            return 0.0;
        }
        let slow = self.slowed.as_ref().map_or(1.0, |s| s.factor);
        slow * self.poison_slow.unwrap_or(1.0)
    }

    /// Advances every timer, dropping effects that ended.
    /// Returns the number of poison damage ticks that came due.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        if self
            .frozen
            .as_mut()
            .is_some_and(|timer| timer.tick(delta).is_finished())
        {
            self.frozen = None;
        }
        if self
            .slowed
            .as_mut()
            .is_some_and(|slow| slow.timer.tick(delta).is_finished())
        {
            self.slowed = None;
        }

        let Some(poison) = self.poisoned.as_mut() else {
            return 0;
        };
        let due = poison.tick.tick(delta).times_finished_this_tick().min(poison.remaining);
        poison.remaining -= due;
        if poison.remaining == 0 {
            // Poison slow ends together with the poison.
            self.poisoned = None;
            self.poison_slow = None;
        }
        due
    }
}

/// Enemy movement speed. `current` is derived from `original` and active effects.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MoveSpeed {
    pub original: f32,
    pub current: f32,
}

impl MoveSpeed {
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self {
            original: speed,
            current: speed,
        }
    }

    pub fn refresh(&mut self, effects: &StatusEffects) {
        self.current = if effects.is_clear() {
            self.original
        } else {
            self.original * effects.speed_factor()
        };
    }
}

// === Systems ===

/// Ticks effects, deals poison damage and refreshes move speed.
fn tick_status_effects(
    time: Res<Time>,
    mut affected: Query<(
        Entity,
        &mut StatusEffects,
        &mut MoveSpeed,
        Option<&mut LinearVelocity>,
    )>,
    mut damage: MessageWriter<DamageMessage>,
) {
    for (entity, mut effects, mut speed, velocity) in &mut affected {
        let ticks = effects.tick(time.delta());
        for _ in 0..ticks {
            damage.write(DamageMessage::new(entity, POISON_DAMAGE));
        }
        speed.refresh(&effects);
        if let Some(mut velocity) = velocity.filter(|_| effects.is_frozen()) {
            *velocity = LinearVelocity::ZERO;
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<StatusEffects>()
        .register_type::<MoveSpeed>();

    app.add_systems(
        Update,
        tick_status_effects
            .in_set(GameSet::Status)
            .run_if(gameplay_running),
    );
}
