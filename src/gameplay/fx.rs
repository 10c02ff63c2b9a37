//! Cosmetic effects: floating numbers, level-up banners, defeat bursts, flashes and hit tint.

use bevy::prelude::*;

use crate::{GameSet, Z_FX};
use crate::gameplay::Tint;
use crate::gameplay::combat::{DamageNumber, Defeated, HitFlash};
use crate::gameplay::progression::LevelUp;
use crate::gameplay::snake::Player;
use crate::screens::GameState;
use crate::theme::palette;

// === Constants ===

pub const DAMAGE_NUMBER_SECS: f32 = 0.6;
/// Upward drift of damage numbers, in pixels per second.
pub const DAMAGE_NUMBER_RISE: f32 = 40.0;
pub const BURST_SECS: f32 = 0.25;
pub const FLASH_SECS: f32 = 0.15;
pub const LEVEL_UP_SECS: f32 = 1.2;

const BURST_SIZE: f32 = 24.0;
const BEAM_WIDTH: f32 = 3.0;

// === Messages ===

/// Briefly highlight a circular area.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct AreaFlash {
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Briefly draw a line between two points.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BeamFlash {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

// === Components ===

/// Despawns the entity when the timer runs out.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FxLifetime(pub Timer);

impl FxLifetime {
    #[must_use]
    pub fn from_seconds(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

/// Drifts upward while alive.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FloatingNumber;

// === Systems ===

fn spawn_damage_numbers(mut commands: Commands, mut numbers: MessageReader<DamageNumber>) {
    for number in numbers.read() {
        commands.spawn((
            Name::new("Damage Number"),
            FloatingNumber,
            FxLifetime::from_seconds(DAMAGE_NUMBER_SECS),
            Text2d::new(format!("{}", number.amount.round())),
            TextFont {
                font_size: palette::FONT_SIZE_SMALL,
                ..default()
            },
            TextColor(palette::DAMAGE_TEXT),
            Transform::from_translation(number.position.extend(Z_FX)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_level_up_banners(
    mut commands: Commands,
    mut level_ups: MessageReader<LevelUp>,
    player: Single<&Transform, With<Player>>,
) {
    let above = player.translation.truncate() + Vec2::Y * palette::FONT_SIZE_HUD;
    for level_up in level_ups.read() {
        commands.spawn((
            Name::new("Level Up Banner"),
            FloatingNumber,
            FxLifetime::from_seconds(LEVEL_UP_SECS),
            Text2d::new(format!("Level {}!", level_up.level)),
            TextFont::from_font_size(palette::FONT_SIZE_HUD),
            TextColor(palette::SCORE_TEXT),
            Transform::from_translation(above.extend(Z_FX)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_defeat_bursts(mut commands: Commands, mut defeats: MessageReader<Defeated>) {
    for defeat in defeats.read() {
        commands.spawn((
            Name::new("Defeat Burst"),
            FxLifetime::from_seconds(BURST_SECS),
            Sprite::from_color(defeat.color.with_alpha(0.6), Vec2::splat(BURST_SIZE)),
            Transform::from_translation(defeat.position.extend(Z_FX)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_area_flashes(mut commands: Commands, mut flashes: MessageReader<AreaFlash>) {
    for flash in flashes.read() {
        commands.spawn((
            Name::new("Area Flash"),
            FxLifetime::from_seconds(FLASH_SECS),
            Sprite::from_color(flash.color.with_alpha(0.3), Vec2::splat(flash.radius * 2.0)),
            Transform::from_translation(flash.position.extend(Z_FX)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_beam_flashes(mut commands: Commands, mut beams: MessageReader<BeamFlash>) {
    for beam in beams.read() {
        let span = beam.to - beam.from;
        let midpoint = beam.from + span / 2.0;
        commands.spawn((
            Name::new("Beam Flash"),
            FxLifetime::from_seconds(FLASH_SECS),
            Sprite::from_color(beam.color, Vec2::new(span.length(), BEAM_WIDTH)),
            Transform::from_translation(midpoint.extend(Z_FX))
                .with_rotation(Quat::from_rotation_z(span.to_angle())),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Shows the flash color while [`HitFlash`] runs, then restores the entity's [`Tint`].
fn update_hit_flash(
    time: Res<Time>,
    mut commands: Commands,
    mut flashing: Query<(Entity, &mut HitFlash, &mut Sprite, Option<&Tint>)>,
) {
    for (entity, mut flash, mut sprite, tint) in &mut flashing {
        if flash.0.tick(time.delta()).is_finished() {
            if let Some(tint) = tint {
                sprite.color = tint.0;
            }
            commands.entity(entity).remove::<HitFlash>();
        } else {
            sprite.color = palette::HIT_FLASH;
        }
    }
}

fn age_fx(
    time: Res<Time>,
    mut commands: Commands,
    mut fx: Query<(Entity, &mut FxLifetime, &mut Transform, Has<FloatingNumber>)>,
) {
    for (entity, mut lifetime, mut transform, floating) in &mut fx {
        if lifetime.0.tick(time.delta()).is_finished() {
            commands.entity(entity).try_despawn();
            continue;
        }
        if floating {
            transform.translation.y += DAMAGE_NUMBER_RISE * time.delta_secs();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<FxLifetime>()
        .register_type::<FloatingNumber>();
    app.add_message::<AreaFlash>().add_message::<BeamFlash>();

    app.add_systems(
        Update,
        (
            spawn_damage_numbers,
            spawn_level_up_banners,
            spawn_defeat_bursts,
            spawn_area_flashes,
            spawn_beam_flashes,
            update_hit_flash,
            age_fx,
        )
            .in_set(GameSet::Ui)
            .run_if(in_state(GameState::InGame)),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::{advance_and_update, assert_entity_count, create_base_test_app};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_fx_test_app() -> App {
        let mut app = create_base_test_app();
        app.add_message::<DamageNumber>()
            .add_message::<Defeated>()
            .add_message::<AreaFlash>()
            .add_message::<BeamFlash>()
            .add_message::<LevelUp>();
        app.add_systems(
            Update,
            (
                spawn_damage_numbers,
                spawn_level_up_banners,
                spawn_defeat_bursts,
                spawn_area_flashes,
                spawn_beam_flashes,
                update_hit_flash,
                age_fx,
            )
                .chain(),
        );
        app.update();
        app
    }

    #[test]
    fn damage_number_rises_then_despawns() {
        let mut app = create_fx_test_app();
        app.world_mut().write_message(DamageNumber {
            position: Vec2::ZERO,
            amount: 2.0,
        });
        app.update();
        assert_entity_count::<With<FloatingNumber>>(&mut app, 1);

        advance_and_update(&mut app, Duration::from_millis(300));
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<FloatingNumber>>();
        let y = query
            .single(app.world())
            .map(|t| t.translation.y)
            .unwrap_or_default();
        assert!(y > 0.0);

        advance_and_update(&mut app, Duration::from_millis(400));
        assert_entity_count::<With<FloatingNumber>>(&mut app, 0);
    }

    #[test]
    fn level_up_banner_floats_over_the_head() {
        let mut app = create_fx_test_app();
        app.world_mut().spawn((
            Player {
                hero: crate::gameplay::attacks::hero::HeroClass::Mage,
            },
            Transform::from_xyz(50.0, 0.0, 0.0),
        ));
        app.world_mut().write_message(LevelUp { level: 2 });
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&Text2d, &Transform), With<FloatingNumber>>();
        let banner = query
            .single(app.world())
            .ok()
            .map(|(text, transform)| (text.0.clone(), transform.translation.x));
        assert_eq!(banner, Some(("Level 2!".to_string(), 50.0)));
    }

    #[test]
    fn every_flash_kind_spawns_a_short_lived_entity() {
        let mut app = create_fx_test_app();
        let world = app.world_mut();
        let entity = world.spawn_empty().id();
        world.write_message(Defeated {
            entity,
            position: Vec2::ZERO,
            color: Color::WHITE,
        });
        world.write_message(AreaFlash {
            position: Vec2::ZERO,
            radius: 10.0,
            color: Color::WHITE,
        });
        world.write_message(BeamFlash {
            from: Vec2::ZERO,
            to: Vec2::new(10.0, 10.0),
            color: Color::WHITE,
        });
        app.update();
        assert_entity_count::<With<FxLifetime>>(&mut app, 3);

        advance_and_update(&mut app, Duration::from_millis(300));
        assert_entity_count::<With<FxLifetime>>(&mut app, 0);
    }

    #[test]
    fn hit_flash_restores_tint() {
        let mut app = create_fx_test_app();
        let tint = Color::srgb(0.1, 0.2, 0.3);
        let entity = app
            .world_mut()
            .spawn((
                HitFlash::default(),
                Tint(tint),
                Sprite::from_color(tint, Vec2::ONE),
            ))
            .id();

        advance_and_update(&mut app, Duration::from_millis(50));
        assert_eq!(
            app.world().get::<Sprite>(entity).map(|s| s.color),
            Some(palette::HIT_FLASH)
        );

        advance_and_update(&mut app, Duration::from_millis(100));
        let world = app.world();
        assert_eq!(world.get::<Sprite>(entity).map(|s| s.color), Some(tint));
        assert!(world.get::<HitFlash>(entity).is_none());
    }
}
