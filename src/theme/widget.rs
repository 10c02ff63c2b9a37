//! Reusable UI widget constructors.

use bevy::prelude::*;

use super::palette;

/// Full-screen column that centers its children.
pub fn ui_root(name: impl Into<std::borrow::Cow<'static, str>>) -> impl Bundle {
    (
        Name::new(name),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(20.0),
            ..default()
        },
    )
}

/// [`ui_root`] drawn over the arena: dimmed and stacked above the HUD.
pub fn overlay_root(name: impl Into<std::borrow::Cow<'static, str>>) -> impl Bundle {
    (
        ui_root(name),
        BackgroundColor(palette::OVERLAY_BACKGROUND),
        GlobalZIndex(1),
    )
}

/// A single line of UI text.
pub fn text(content: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(content),
        TextFont::from_font_size(size),
        TextColor(color),
    )
}

pub fn header(content: impl Into<String>) -> impl Bundle {
    text(content, palette::FONT_SIZE_HEADER, palette::HEADER_TEXT)
}

pub fn label(content: impl Into<String>) -> impl Bundle {
    text(content, palette::FONT_SIZE_LABEL, palette::BODY_TEXT)
}

/// Key hints.
pub fn prompt(content: impl Into<String>) -> impl Bundle {
    text(content, palette::FONT_SIZE_PROMPT, palette::BODY_TEXT)
}
