//! Color constants and font size tokens for consistent theming.

use bevy::prelude::*;

// === Text Colors ===

/// Header/title text color (white).
pub const HEADER_TEXT: Color = Color::WHITE;

/// Body/subtitle text color (light gray).
pub const BODY_TEXT: Color = Color::srgb(0.7, 0.7, 0.7);

/// Score and level readout (yellow-gold).
pub const SCORE_TEXT: Color = Color::srgb(1.0, 0.85, 0.0);

/// Floating damage numbers.
pub const DAMAGE_TEXT: Color = Color::srgb(1.0, 0.95, 0.6);

// === UI Backgrounds ===

/// Semi-transparent dark overlay for pause/modal screens.
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);

/// Panel background (dark blue-gray, nearly opaque).
pub const PANEL_BACKGROUND: Color = Color::srgba(0.1, 0.1, 0.15, 0.95);

/// Panel border (light blue-gray, semi-transparent).
pub const PANEL_BORDER: Color = Color::srgba(0.5, 0.5, 0.6, 0.8);

// === Arena Colors ===

pub const ARENA_BACKGROUND: Color = Color::srgb(0.1, 0.1, 0.12);
pub const PICKUP: Color = Color::srgb(0.95, 0.8, 0.2);
pub const ENEMY: Color = Color::srgb(0.8, 0.2, 0.2);
pub const FOLLOWER: Color = Color::srgb(0.3, 0.7, 0.3);
pub const PROJECTILE: Color = Color::srgb(1.0, 1.0, 0.3);
pub const FROST_PROJECTILE: Color = Color::srgb(0.5, 0.85, 1.0);
pub const HIT_FLASH: Color = Color::WHITE;
pub const DEFEAT_BURST: Color = Color::srgba(1.0, 0.5, 0.2, 0.8);

// === Hazard Colors ===

pub const ICE_RING: Color = Color::srgba(0.6, 0.9, 1.0, 0.35);
pub const HOLY_FIELD: Color = Color::srgba(1.0, 0.95, 0.5, 0.25);
pub const SNIPER_MARK: Color = Color::srgba(1.0, 0.1, 0.1, 0.6);
pub const MUSHROOM: Color = Color::srgb(0.75, 0.35, 0.85);
pub const MINE: Color = Color::srgb(0.45, 0.4, 0.3);
pub const POISON_CLOUD: Color = Color::srgba(0.4, 0.85, 0.2, 0.3);

// === Health Bar Colors ===

pub const HEALTH_BAR_BG: Color = Color::srgb(0.8, 0.1, 0.1);
pub const HEALTH_BAR_FILL: Color = Color::srgb(0.1, 0.9, 0.1);

// === Font Size Tokens ===

pub const FONT_SIZE_HEADER: f32 = 64.0;
pub const FONT_SIZE_LABEL: f32 = 32.0;
pub const FONT_SIZE_HUD: f32 = 22.0;
pub const FONT_SIZE_PROMPT: f32 = 24.0;
pub const FONT_SIZE_SMALL: f32 = 14.0;
