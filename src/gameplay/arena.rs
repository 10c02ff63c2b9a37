//! Arena layout: grid constants, cell/world conversion and spawn geometry.

#![allow(clippy::cast_precision_loss)] // Grid values are small; i32->f32 is exact.

use bevy::prelude::*;
use rand::Rng;

use crate::Z_BACKGROUND;
use crate::screens::GameState;
use crate::theme::palette;

// === Grid Constants ===

/// Size of a single grid cell in pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Number of columns in the arena.
pub const GRID_COLS: i32 = 25;

/// Number of rows in the arena.
pub const GRID_ROWS: i32 = 18;

/// Arena width in pixels.
pub const ARENA_WIDTH: f32 = GRID_COLS as f32 * TILE_SIZE;
// = 25 * 32 = 800.0

/// Arena height in pixels.
pub const ARENA_HEIGHT: f32 = GRID_ROWS as f32 * TILE_SIZE;
// = 18 * 32 = 576.0

/// Window size matching the arena exactly.
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 576;

/// Length of the arena diagonal; the longest straight line an attack can cover.
pub const ARENA_DIAGONAL: f32 = 985.8;

/// How far outside the visible edge enemies appear.
pub const EDGE_SPAWN_MARGIN: f32 = TILE_SIZE;

/// Cell at the center of the arena, where the head starts.
pub const CENTER_CELL: IVec2 = IVec2::new(GRID_COLS / 2, GRID_ROWS / 2);

// === Marker Components ===

/// Marks the arena backdrop sprite.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ArenaBackground;

/// One of the four screen edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

// === Helper Functions ===

/// World-space center of a grid cell. The arena is centered on the origin.
#[must_use]
pub fn cell_to_world(cell: IVec2) -> Vec2 {
    Vec2::new(
        (cell.x as f32).mul_add(TILE_SIZE, TILE_SIZE / 2.0) - ARENA_WIDTH / 2.0,
        (cell.y as f32).mul_add(TILE_SIZE, TILE_SIZE / 2.0) - ARENA_HEIGHT / 2.0,
    )
}

/// Whether a cell lies inside the playfield.
#[must_use]
pub const fn cell_in_bounds(cell: IVec2) -> bool {
    cell.x >= 0 && cell.x < GRID_COLS && cell.y >= 0 && cell.y < GRID_ROWS
}

/// Whether a world point lies inside the playfield grown by `margin` on every side.
#[must_use]
pub fn in_world(position: Vec2, margin: f32) -> bool {
    position.x.abs() <= ARENA_WIDTH / 2.0 + margin
        && position.y.abs() <= ARENA_HEIGHT / 2.0 + margin
}

/// Uniformly random cell inside the playfield.
pub fn random_cell(rng: &mut impl Rng) -> IVec2 {
    IVec2::new(rng.random_range(0..GRID_COLS), rng.random_range(0..GRID_ROWS))
}

/// Random point just outside a uniformly chosen screen edge.
pub fn edge_spawn_point(rng: &mut impl Rng) -> Vec2 {
    let half_w = ARENA_WIDTH / 2.0;
    let half_h = ARENA_HEIGHT / 2.0;
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    match edge {
        Edge::Top => Vec2::new(rng.random_range(-half_w..half_w), half_h + EDGE_SPAWN_MARGIN),
        Edge::Bottom => Vec2::new(
            rng.random_range(-half_w..half_w),
            -half_h - EDGE_SPAWN_MARGIN,
        ),
        Edge::Left => Vec2::new(-half_w - EDGE_SPAWN_MARGIN, rng.random_range(-half_h..half_h)),
        Edge::Right => Vec2::new(half_w + EDGE_SPAWN_MARGIN, rng.random_range(-half_h..half_h)),
    }
}

// === Systems ===

fn spawn_background(mut commands: Commands) {
    commands.spawn((
        Name::new("Arena Background"),
        ArenaBackground,
        Sprite::from_color(
            palette::ARENA_BACKGROUND,
            Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
        ),
        Transform::from_xyz(0.0, 0.0, Z_BACKGROUND),
        DespawnOnExit(GameState::InGame),
    ));
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ArenaBackground>();
    app.add_systems(OnEnter(GameState::InGame), spawn_background);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn arena_dimensions_match_window() {
        assert_eq!(ARENA_WIDTH, WINDOW_WIDTH as f32);
        assert_eq!(ARENA_HEIGHT, WINDOW_HEIGHT as f32);
    }

    #[test]
    fn diagonal_matches_dimensions() {
        let diagonal = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT).length();
        assert!((diagonal - ARENA_DIAGONAL).abs() < 1.0);
    }

    #[test]
    fn corner_cells_map_inside_the_arena() {
        let bottom_left = cell_to_world(IVec2::ZERO);
        assert_eq!(bottom_left, Vec2::new(-384.0, -272.0));
        let top_right = cell_to_world(IVec2::new(GRID_COLS - 1, GRID_ROWS - 1));
        assert_eq!(top_right, Vec2::new(384.0, 272.0));
    }

    #[test]
    fn bounds_reject_outside_cells() {
        assert!(cell_in_bounds(CENTER_CELL));
        assert!(!cell_in_bounds(IVec2::new(-1, 0)));
        assert!(!cell_in_bounds(IVec2::new(GRID_COLS, 0)));
        assert!(!cell_in_bounds(IVec2::new(0, GRID_ROWS)));
    }

    #[test]
    fn edge_spawns_sit_outside_the_visible_arena() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let point = edge_spawn_point(&mut rng);
            assert!(!in_world(point, 0.0), "{point} should be off-screen");
            assert!(in_world(point, EDGE_SPAWN_MARGIN + 0.01));
        }
    }

    #[test]
    fn random_cells_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert!(cell_in_bounds(random_cell(&mut rng)));
        }
    }
}
