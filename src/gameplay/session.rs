//! Session lifecycle: configuration, seeded randomness and the game-over latch.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::gameplay::attacks::hero::HeroClass;
use crate::menus::Menu;
use crate::screens::GameState;

/// Environment variable holding a fixed RNG seed.
pub const SEED_ENV: &str = "SERPENT_SEED";

/// Environment variable naming the starting hero.
pub const HERO_ENV: &str = "SERPENT_HERO";

// === Resources ===

/// Settings that survive restarts. The game-over screen edits `hero`.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub seed: Option<u64>,
    pub hero: HeroClass,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let seed = std::env::var(SEED_ENV)
            .ok()
            .and_then(|val| val.parse().ok());
        let hero = std::env::var(HERO_ENV)
            .ok()
            .and_then(|val| HeroClass::parse(&val))
            .unwrap_or_default();
        Self { seed, hero }
    }
}

/// Live session flags. Rebuilt on every entry into `GameState::InGame`.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct Session {
    pub hero: HeroClass,
    pub game_over: bool,
}

/// Every random draw in the simulation goes through this generator.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub StdRng);

impl GameRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    SelfCollision,
    LeftArena,
    PlayerDefeated,
}

// === Helpers ===

/// Ends the session. Returns `false` (and changes nothing) if it already ended.
pub fn trigger_game_over(
    session: &mut Session,
    next_menu: &mut NextState<Menu>,
    reason: GameOverReason,
) -> bool {
    if session.game_over {
        return false;
    }
    session.game_over = true;
    next_menu.set(Menu::GameOver);
    info!(?reason, "game over");
    true
}

// === Systems ===

fn start_session(mut commands: Commands, config: Res<SessionConfig>) {
    commands.insert_resource(Session {
        hero: config.hero,
        game_over: false,
    });
    commands.insert_resource(
        config
            .seed
            .map_or_else(GameRng::default, GameRng::seeded),
    );
    info!(hero = config.hero.display_name(), seed = ?config.seed, "session started");
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Session>();

    if !app.world().contains_resource::<SessionConfig>() {
        app.insert_resource(SessionConfig::from_env());
    }
    app.init_resource::<Session>().init_resource::<GameRng>();

    app.add_systems(OnEnter(GameState::InGame), start_session);
}
