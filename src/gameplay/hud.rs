//! In-game HUD: score, level, experience and the hero special readout.

use bevy::prelude::*;

use crate::gameplay::attacks::SpecialCooldown;
use crate::gameplay::progression::Progress;
use crate::gameplay::snake::Player;
use crate::screens::GameState;
use crate::theme::{palette, widget};
use crate::{GameSet, gameplay_running};

// === Components ===

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ScoreDisplay;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LevelDisplay;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpecialDisplay;

// === Formatting ===

fn score_label(progress: &Progress) -> String {
    format!("Score {}", progress.score)
}

fn level_label(progress: &Progress) -> String {
    format!(
        "Level {}  XP {}/{}",
        progress.level, progress.experience, progress.experience_to_next_level
    )
}

/// `ratio` is the fraction of the cooldown still to wait.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn special_label(ratio: f32) -> String {
    if ratio <= 0.0 {
        return "Special ready".to_string();
    }
    let charged = ((1.0 - ratio) * 100.0).floor() as u32;
    format!("Special {charged}%")
}

fn hud_text(content: String) -> impl Bundle {
    widget::text(content, palette::FONT_SIZE_HUD, palette::SCORE_TEXT)
}

// === Systems ===

fn spawn_hud(mut commands: Commands) {
    let progress = Progress::default();
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        },
        DespawnOnExit(GameState::InGame),
        children![
            (ScoreDisplay, hud_text(score_label(&progress))),
            (LevelDisplay, hud_text(level_label(&progress))),
            (SpecialDisplay, hud_text(special_label(0.0))),
        ],
    ));
}

fn update_progress_text(
    progress: Res<Progress>,
    mut score: Single<&mut Text, (With<ScoreDisplay>, Without<LevelDisplay>)>,
    mut level: Single<&mut Text, (With<LevelDisplay>, Without<ScoreDisplay>)>,
) {
    if !progress.is_changed() {
        return;
    }
    ***score = score_label(&progress);
    ***level = level_label(&progress);
}

fn update_special_text(
    cooldown: Single<&SpecialCooldown, With<Player>>,
    mut text: Single<&mut Text, With<SpecialDisplay>>,
) {
    let label = special_label(cooldown.0.ratio());
    if text.0 != label {
        text.0 = label;
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ScoreDisplay>()
        .register_type::<LevelDisplay>()
        .register_type::<SpecialDisplay>();

    app.add_systems(OnEnter(GameState::InGame), spawn_hud);
    app.add_systems(
        Update,
        (update_progress_text, update_special_text)
            .in_set(GameSet::Ui)
            .run_if(gameplay_running),
    );
}
