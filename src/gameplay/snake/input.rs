//! Keyboard steering and pointer-aimed attack requests.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::Player;
use crate::gameplay::{Facing, Heading};
use crate::screens::GameState;
use crate::{GameSet, MainCamera, gameplay_running};

/// The turn queued for the next tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub next: Option<Facing>,
}

impl Steering {
    /// Queues a turn unless it reverses `current`. Returns whether it was accepted.
    pub fn queue(&mut self, current: Facing, requested: Facing) -> bool {
        if requested == current.opposite() {
            return false;
        }
        self.next = Some(requested);
        true
    }
}

/// This frame's attack requests. `aim` is the cursor in world space.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct HeroInput {
    pub aim: Option<Vec2>,
    pub basic: bool,
    pub special: bool,
}

const STEERING_KEYS: [(KeyCode, KeyCode, Facing); 4] = [
    (KeyCode::ArrowUp, KeyCode::KeyW, Facing::Up),
    (KeyCode::ArrowDown, KeyCode::KeyS, Facing::Down),
    (KeyCode::ArrowLeft, KeyCode::KeyA, Facing::Left),
    (KeyCode::ArrowRight, KeyCode::KeyD, Facing::Right),
];

fn reset_input(mut commands: Commands) {
    commands.insert_resource(Steering::default());
    commands.insert_resource(HeroInput::default());
}

fn read_steering(
    keys: Res<ButtonInput<KeyCode>>,
    heading: Single<&Heading, With<Player>>,
    mut steering: ResMut<Steering>,
) {
    for (arrow, letter, facing) in STEERING_KEYS {
        if keys.any_just_pressed([arrow, letter]) {
            steering.queue(heading.0, facing);
        }
    }
}

fn read_attack_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut input: ResMut<HeroInput>,
) {
    let (camera, camera_transform) = *camera;
    input.aim = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok());
    input.basic = mouse.pressed(MouseButton::Left);
    input.special = keys.just_pressed(KeyCode::Space);
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Steering>().init_resource::<HeroInput>();
    app.add_systems(OnEnter(GameState::InGame), reset_input);
    app.add_systems(
        Update,
        (read_steering, read_attack_input)
            .in_set(GameSet::Input)
            .run_if(gameplay_running),
    );
}
