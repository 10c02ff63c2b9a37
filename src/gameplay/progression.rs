//! Score, experience and levels, plus the tuning values each level tightens.

use bevy::prelude::*;

use crate::screens::GameState;
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_EXPERIENCE_TO_NEXT_LEVEL: u32 = 100;

/// Threshold growth per level (floored).
pub const EXPERIENCE_GROWTH: f32 = 1.2;

pub const STARTING_MOVE_DELAY_MS: u32 = 150;
pub const MOVE_DELAY_STEP_MS: u32 = 5;
pub const MIN_MOVE_DELAY_MS: u32 = 70;

pub const STARTING_SPECIAL_COOLDOWN_MS: u32 = 3000;
pub const SPECIAL_COOLDOWN_STEP_MS: u32 = 100;
pub const MIN_SPECIAL_COOLDOWN_MS: u32 = 1000;

// === Resources ===

#[derive(Resource, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct Progress {
    pub score: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub level: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            score: 0,
            experience: 0,
            experience_to_next_level: STARTING_EXPERIENCE_TO_NEXT_LEVEL,
            level: STARTING_LEVEL,
        }
    }
}

/// Values that tighten with every level.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct Tuning {
    pub move_delay_ms: u32,
    pub special_cooldown_max_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_delay_ms: STARTING_MOVE_DELAY_MS,
            special_cooldown_max_ms: STARTING_SPECIAL_COOLDOWN_MS,
        }
    }
}

impl Tuning {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn special_cooldown_secs(&self) -> f32 {
        self.special_cooldown_max_ms as f32 / 1000.0
    }
}

// === Messages ===

/// Score and experience earned by a defeat or a pickup.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub score: u32,
    pub experience: u32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
}

// === Helpers ===

/// Adds experience and performs at most one level-up. Returns whether a level was gained.
///
/// Excess experience past the threshold is discarded.
pub fn add_experience(progress: &mut Progress, tuning: &mut Tuning, amount: u32) -> bool {
    progress.experience += amount;
    if progress.experience < progress.experience_to_next_level {
        return false;
    }

    progress.level += 1;
    progress.experience = 0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        progress.experience_to_next_level =
            (progress.experience_to_next_level as f32 * EXPERIENCE_GROWTH).floor() as u32;
    }

    tuning.move_delay_ms = tuning
        .move_delay_ms
        .saturating_sub(MOVE_DELAY_STEP_MS)
        .max(MIN_MOVE_DELAY_MS);
    tuning.special_cooldown_max_ms = tuning
        .special_cooldown_max_ms
        .saturating_sub(SPECIAL_COOLDOWN_STEP_MS)
        .max(MIN_SPECIAL_COOLDOWN_MS);
    true
}

// === Systems ===

fn reset_progress(mut commands: Commands) {
    commands.insert_resource(Progress::default());
    commands.insert_resource(Tuning::default());
}

fn collect_rewards(
    mut rewards: MessageReader<Reward>,
    mut progress: ResMut<Progress>,
    mut tuning: ResMut<Tuning>,
    mut level_ups: MessageWriter<LevelUp>,
) {
    for reward in rewards.read() {
        progress.score += reward.score;
        if add_experience(&mut progress, &mut tuning, reward.experience) {
            info!(
                level = progress.level,
                move_delay_ms = tuning.move_delay_ms,
                "level up"
            );
            level_ups.write(LevelUp {
                level: progress.level,
            });
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Progress>().register_type::<Tuning>();
    app.init_resource::<Progress>().init_resource::<Tuning>();
    app.add_message::<Reward>().add_message::<LevelUp>();

    app.add_systems(OnEnter(GameState::InGame), reset_progress);
    app.add_systems(
        Update,
        collect_rewards
            .in_set(GameSet::Progression)
            .run_if(gameplay_running),
    );
}
