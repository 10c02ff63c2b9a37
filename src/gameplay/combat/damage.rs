//! Damage resolution: every health change in the game flows through [`DamageMessage`].

use bevy::prelude::*;

use crate::gameplay::enemies::Enemy;
use crate::gameplay::progression::Reward;
use crate::gameplay::session::{GameOverReason, Session, trigger_game_over};
use crate::gameplay::snake::{Chain, Follower, Player};
use crate::gameplay::{Health, Tint};
use crate::menus::Menu;
use crate::{GameSet, gameplay_running};

/// How long a surviving target flashes after a hit.
pub const HIT_FLASH_SECS: f32 = 0.1;

// === Messages ===

/// Request to damage `target`. Resolved in `GameSet::Damage`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageMessage {
    pub target: Entity,
    pub amount: f32,
    /// Replaces the enemy's score value if this hit defeats it.
    pub score_override: Option<u32>,
}

impl DamageMessage {
    #[must_use]
    pub const fn new(target: Entity, amount: f32) -> Self {
        Self {
            target,
            amount,
            score_override: None,
        }
    }

    /// A hit that defeats any living target outright and awards `score`.
    #[must_use]
    pub const fn execute(target: Entity, score: u32) -> Self {
        Self {
            target,
            amount: f32::INFINITY,
            score_override: Some(score),
        }
    }
}

/// Damage actually dealt, for floating numbers.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageNumber {
    pub position: Vec2,
    pub amount: f32,
}

/// An enemy or follower was defeated at `position`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct Defeated {
    pub entity: Entity,
    pub position: Vec2,
    pub color: Color,
}

// === Components ===

/// Brief tint override after a non-lethal hit.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HitFlash(pub Timer);

impl Default for HitFlash {
    fn default() -> Self {
        Self(Timer::from_seconds(HIT_FLASH_SECS, TimerMode::Once))
    }
}

// === Helpers ===

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    /// Target was already defeated or the amount was not positive.
    Ignored,
    Wounded { dealt: f32 },
    Defeated { dealt: f32 },
}

/// Lowers health by `amount`, never below zero and never on a defeated target.
pub fn resolve_hit(health: &mut Health, amount: f32) -> HitResult {
    if health.is_depleted() || amount <= 0.0 || amount.is_nan() {
        return HitResult::Ignored;
    }
    let before = health.current;
    health.current = (health.current - amount).max(0.0);
    let dealt = before - health.current;
    if health.is_depleted() {
        HitResult::Defeated { dealt }
    } else {
        HitResult::Wounded { dealt }
    }
}

// === Systems ===

fn apply_damage(
    mut commands: Commands,
    mut messages: MessageReader<DamageMessage>,
    mut targets: Query<(
        &mut Health,
        &Transform,
        Option<&Enemy>,
        Has<Player>,
        Has<Follower>,
        Option<&Tint>,
    )>,
    mut chain: ResMut<Chain>,
    mut session: ResMut<Session>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut numbers: MessageWriter<DamageNumber>,
    mut defeats: MessageWriter<Defeated>,
    mut rewards: MessageWriter<Reward>,
) {
    for message in messages.read() {
        if session.game_over {
            // Drain the rest unapplied.
            continue;
        }
        let Ok((mut health, transform, enemy, is_player, is_follower, tint)) =
            targets.get_mut(message.target)
        else {
            continue;
        };
        let position = transform.translation.truncate();

        let dealt = match resolve_hit(&mut health, message.amount) {
            HitResult::Ignored => continue,
            HitResult::Wounded { dealt } => {
                commands.entity(message.target).insert(HitFlash::default());
                dealt
            }
            HitResult::Defeated { dealt } => {
                let color = tint.map_or(Color::WHITE, |tint| tint.0);
                if let Some(enemy) = enemy {
                    let score = message.score_override.unwrap_or(enemy.score_value);
                    rewards.write(Reward {
                        score,
                        experience: score,
                    });
                    commands.entity(message.target).despawn();
                    defeats.write(Defeated {
                        entity: message.target,
                        position,
                        color,
                    });
                } else if is_player {
                    trigger_game_over(&mut session, &mut next_menu, GameOverReason::PlayerDefeated);
                } else if is_follower {
                    chain.remove(message.target);
                    commands.entity(message.target).despawn();
                    defeats.write(Defeated {
                        entity: message.target,
                        position,
                        color,
                    });
                }
                dealt
            }
        };
        numbers.write(DamageNumber {
            position,
            amount: dealt,
        });
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HitFlash>();
    app.add_message::<DamageMessage>()
        .add_message::<DamageNumber>()
        .add_message::<Defeated>();

    app.add_systems(
        Update,
        apply_damage
            .in_set(GameSet::Damage)
            .run_if(gameplay_running),
    );
}
