//! Serpent Arena entry point.

use bevy::prelude::*;
use serpent_arena::gameplay::arena::{WINDOW_HEIGHT, WINDOW_WIDTH};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Serpent Arena".to_string(),
                        resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins(serpent_arena::plugin)
        .run();
}
