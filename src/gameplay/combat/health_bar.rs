//! Health bars above segments and enemies. Hidden while at full health.

use bevy::prelude::*;

use crate::gameplay::Health;
use crate::theme::palette;
use crate::{GameSet, gameplay_running};

// === Components ===

/// Bar backdrop. Child of the entity owning the `Health`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarBackground;

/// Bar fill, scaled horizontally by the health ratio.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarFill;

/// Bar geometry. Entities with `Health` but no config get no bar.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HealthBarConfig {
    pub width: f32,
    pub height: f32,
    pub y_offset: f32,
}

// === Systems ===

fn spawn_health_bars(
    add: On<Add, Health>,
    configs: Query<&HealthBarConfig>,
    mut commands: Commands,
) {
    let Ok(config) = configs.get(add.entity) else {
        return;
    };
    let size = Vec2::new(config.width, config.height);
    commands.entity(add.entity).with_children(|parent| {
        parent.spawn((
            Name::new("Health Bar BG"),
            HealthBarBackground,
            Sprite::from_color(palette::HEALTH_BAR_BG, size),
            Transform::from_xyz(0.0, config.y_offset, 0.5),
            Visibility::Hidden,
        ));
        parent.spawn((
            Name::new("Health Bar Fill"),
            HealthBarFill,
            Sprite::from_color(palette::HEALTH_BAR_FILL, size),
            Transform::from_xyz(0.0, config.y_offset, 0.6),
            Visibility::Hidden,
        ));
    });
}

fn update_health_bars(
    owners: Query<(&Health, &Children, &HealthBarConfig), Changed<Health>>,
    mut fills: Query<&mut Transform, With<HealthBarFill>>,
    mut visibility: Query<&mut Visibility, Or<(With<HealthBarFill>, With<HealthBarBackground>)>>,
) {
    for (health, children, config) in &owners {
        let ratio = health.ratio();
        let shown = if ratio < 1.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for child in children.iter() {
            if let Ok(mut transform) = fills.get_mut(child) {
                transform.scale.x = ratio;
                // Keep the fill anchored to the left edge.
                transform.translation.x = -config.width * (1.0 - ratio) / 2.0;
            }
            if let Ok(mut vis) = visibility.get_mut(child) {
                *vis = shown;
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HealthBarBackground>()
        .register_type::<HealthBarFill>()
        .register_type::<HealthBarConfig>();

    app.add_observer(spawn_health_bars);
    app.add_systems(
        Update,
        update_health_bars
            .in_set(GameSet::Ui)
            .run_if(gameplay_running),
    );
}
