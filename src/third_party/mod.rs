//! Third-party plugin isolation.

mod avian;

pub use avian::{home_toward, within_radius};

pub fn plugin(app: &mut bevy::prelude::App) {
    app.add_plugins(avian::plugin);
}
