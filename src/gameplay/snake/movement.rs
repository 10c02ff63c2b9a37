//! Grid tick: shifts the chain one cell and checks for fatal collisions.

use std::time::Duration;

use bevy::prelude::*;

use super::input::Steering;
use super::{Chain, Follower, Player};
use crate::gameplay::arena::{cell_in_bounds, cell_to_world};
use crate::gameplay::progression::Tuning;
use crate::gameplay::session::{GameOverReason, Session, trigger_game_over};
use crate::gameplay::{Facing, GridPos, Heading};
use crate::menus::Menu;
use crate::screens::GameState;
use crate::{GameSet, gameplay_running};

/// One chain slot: where a segment stands and which way it last moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub cell: IVec2,
    pub facing: Facing,
}

/// Repeating timer driving the grid tick. Its duration follows `Tuning::move_delay_ms`.
#[derive(Resource, Debug, Clone)]
pub struct MoveTimer(pub Timer);

impl MoveTimer {
    #[must_use]
    pub fn from_millis(ms: u32) -> Self {
        Self(Timer::new(
            Duration::from_millis(u64::from(ms)),
            TimerMode::Repeating,
        ))
    }
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self::from_millis(Tuning::default().move_delay_ms)
    }
}

// === Helpers ===

/// Advances a chain by one tick, head first.
///
/// The head steps one cell along its facing; every follower takes the pre-move
/// slot of the segment ahead of it. Returns the slot the tail vacated.
pub fn step_chain(segments: &mut [Segment]) -> Option<Segment> {
    let snapshot = segments.to_vec();
    let head = segments.first_mut()?;
    head.cell += head.facing.offset();
    for (segment, ahead) in segments.iter_mut().skip(1).zip(&snapshot) {
        *segment = *ahead;
    }
    snapshot.last().copied()
}

/// Whether the head shares a cell with any follower.
#[must_use]
pub fn head_collides(segments: &[Segment]) -> bool {
    let [head, followers @ ..] = segments else {
        return false;
    };
    followers.iter().any(|segment| segment.cell == head.cell)
}

// === Systems ===

fn reset_move_timer(mut commands: Commands) {
    commands.insert_resource(MoveTimer::default());
}

fn sync_move_timer(tuning: Res<Tuning>, mut timer: ResMut<MoveTimer>) {
    if tuning.is_changed() {
        timer
            .0
            .set_duration(Duration::from_millis(u64::from(tuning.move_delay_ms)));
    }
}

fn advance_chain(
    time: Res<Time>,
    mut timer: ResMut<MoveTimer>,
    mut steering: ResMut<Steering>,
    mut chain: ResMut<Chain>,
    mut session: ResMut<Session>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut head: Single<(&mut GridPos, &mut Heading), With<Player>>,
    mut followers: Query<(&mut GridPos, &mut Heading), (With<Follower>, Without<Player>)>,
) {
    let steps = timer.0.tick(time.delta()).times_finished_this_tick();
    let (head_pos, head_heading) = &mut *head;

    for _ in 0..steps {
        if session.game_over {
            return;
        }

        chain.followers.retain(|&entity| followers.contains(entity));
        let mut segments = Vec::with_capacity(chain.len() + 1);
        segments.push(Segment {
            cell: head_pos.0,
            facing: head_heading.0,
        });
        for &entity in &chain.followers {
            if let Ok((pos, heading)) = followers.get(entity) {
                segments.push(Segment {
                    cell: pos.0,
                    facing: heading.0,
                });
            }
        }

        chain.vacated = step_chain(&mut segments);

        let [head_segment, trailing @ ..] = segments.as_slice() else {
            return;
        };
        head_pos.0 = head_segment.cell;
        for (&entity, segment) in chain.followers.iter().zip(trailing) {
            if let Ok((mut pos, mut heading)) = followers.get_mut(entity) {
                pos.0 = segment.cell;
                heading.0 = segment.facing;
            }
        }

        let reason = if head_collides(&segments) {
            Some(GameOverReason::SelfCollision)
        } else if !cell_in_bounds(head_segment.cell) {
            Some(GameOverReason::LeftArena)
        } else {
            None
        };
        if let Some(reason) = reason {
            trigger_game_over(&mut session, &mut next_menu, reason);
            return;
        }

        // Turns take effect after the move so a reversal can never fold the head into the chain.
        if let Some(next) = steering.next.take() {
            head_heading.0 = next;
        }
    }
}

fn sync_segment_transforms(mut segments: Query<(&GridPos, &mut Transform), Changed<GridPos>>) {
    for (pos, mut transform) in &mut segments {
        let world = cell_to_world(pos.0);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<MoveTimer>();
    app.add_systems(OnEnter(GameState::InGame), reset_move_timer);
    app.add_systems(
        Update,
        (sync_move_timer, advance_chain, sync_segment_transforms)
            .chain()
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(x: i32, y: i32, facing: Facing) -> Segment {
        Segment {
            cell: IVec2::new(x, y),
            facing,
        }
    }

    #[test]
    fn followers_take_slot_ahead() {
        let mut segments = vec![
            segment(5, 5, Facing::Up),
            segment(4, 5, Facing::Right),
            segment(3, 5, Facing::Right),
        ];

        let vacated = step_chain(&mut segments);

        assert_eq!(
            segments,
            vec![
                segment(5, 6, Facing::Up),
                segment(5, 5, Facing::Up),
                segment(4, 5, Facing::Right),
            ]
        );
        assert_eq!(vacated, Some(segment(3, 5, Facing::Right)));
    }

    #[test]
    fn lone_head_vacates_its_own_cell() {
        let mut segments = vec![segment(0, 0, Facing::Right)];
        assert_eq!(step_chain(&mut segments), Some(segment(0, 0, Facing::Right)));
        assert_eq!(segments[0].cell, IVec2::new(1, 0));
    }

    #[test]
    fn empty_chain_is_a_no_op() {
        assert_eq!(step_chain(&mut []), None);
        assert!(!head_collides(&[]));
    }

    #[test]
    fn follower_trail_replays_head_history() {
        let mut segments = vec![
            segment(5, 5, Facing::Right),
            segment(4, 5, Facing::Right),
            segment(3, 5, Facing::Right),
            segment(2, 5, Facing::Right),
        ];
        let turns = [Facing::Up, Facing::Up, Facing::Left, Facing::Left, Facing::Down];
        let mut history = vec![segments[0].cell];

        for turn in turns {
            step_chain(&mut segments);
            segments[0].facing = turn;
            history.push(segments[0].cell);
        }

        let n = history.len() - 1;
        for i in 1..segments.len() {
            assert_eq!(segments[i].cell, history[n - i], "follower {i}");
        }
    }
}
