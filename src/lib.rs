//! Serpent Arena: snake-style movement meets wave-survival combat.

#[cfg(feature = "dev")]
mod dev_tools;
pub mod gameplay;
pub mod menus;
pub mod screens;
#[cfg(test)]
pub mod testing;
mod theme;
mod third_party;

use bevy::prelude::*;

use crate::gameplay::session::Session;
use crate::menus::Menu;
use crate::screens::GameState;

// === Z Layers ===

/// Arena background.
pub const Z_BACKGROUND: f32 = 0.0;

/// Pickups, engineers and placed hazards.
pub const Z_PICKUP: f32 = 1.0;

/// Enemy bodies.
pub const Z_ENEMY: f32 = 2.0;

/// Player head and followers.
pub const Z_SNAKE: f32 = 3.0;

/// Projectiles in flight.
pub const Z_PROJECTILE: f32 = 4.0;

/// Floating numbers and bursts.
pub const Z_FX: f32 = 5.0;

/// Per-frame ordering of gameplay systems. Configured as a chain.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Keyboard and pointer reads.
    Input,
    /// Spawn director: enemies, pickups, engineers.
    Spawn,
    /// Snake tick, enemy homing, projectile flight.
    Movement,
    /// Contact and projectile overlap checks.
    Collision,
    /// Hero and engineer attacks, staged hazards.
    Attack,
    /// Status effect timers.
    Status,
    /// Damage resolution and defeat handling.
    Damage,
    /// Score and experience.
    Progression,
    /// HUD, health bars and cosmetic effects.
    Ui,
}

/// Run condition: a session is live, no overlay is open and the game is not over.
pub fn gameplay_running(
    game_state: Option<Res<State<GameState>>>,
    menu: Option<Res<State<Menu>>>,
    session: Option<Res<Session>>,
) -> bool {
    game_state.is_some_and(|s| *s.get() == GameState::InGame)
        && menu.is_some_and(|m| *m.get() == Menu::None)
        && session.is_some_and(|s| !s.game_over)
}

/// Full game plugin: simulation plus the physics backend and camera.
pub fn plugin(app: &mut App) {
    app.add_plugins((third_party::plugin, simulation_plugin));
    app.add_systems(Startup, setup_camera);
}

/// Everything except the physics backend and camera. Runs under `MinimalPlugins`.
pub fn simulation_plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Spawn,
            GameSet::Movement,
            GameSet::Collision,
            GameSet::Attack,
            GameSet::Status,
            GameSet::Damage,
            GameSet::Progression,
            GameSet::Ui,
        )
            .chain(),
    );

    app.add_plugins((screens::plugin, menus::plugin, gameplay::plugin));

    #[cfg(feature = "dev")]
    app.add_plugins(dev_tools::plugin);
}

/// Marks the single 2D camera used for pointer aiming.
#[derive(Component, Debug, Clone, Copy)]
pub struct MainCamera;

/// Spawns the global 2D camera. Persists across all states.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d, MainCamera));
}
