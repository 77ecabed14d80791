// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn clock transitions.
//!
//! The clock is a two-state machine: Running, and Stopped while the game
//! is paused or over. The 1-second driver lives in the session controller;
//! this module owns only the transition applied on each tick.

use crate::{GameState, PlayerId};

/// Result of one clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or game over: the countdown is frozen, not reset
    Idle,
    /// One second elapsed; seconds remaining
    Ticked(u32),
    /// The countdown hit zero: the turn passes with no move recorded
    Expired {
        /// The player who now holds the turn
        next_player: PlayerId,
    },
}

/// Apply one 1-second tick to the game state.
///
/// On expiry the clock resets to the full duration and the turn switches
/// to the other player. No edge is set, no box changes owner and no score
/// moves; this is distinct from a capture-driven transfer.
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.is_paused || state.is_game_over {
        return TickOutcome::Idle;
    }

    if state.time_left <= 1 {
        state.current_player = state.current_player.other();
        state.time_left = state.turn_duration;
        tracing::debug!(
            next = state.current_player.number(),
            "turn clock expired, turn passed"
        );
        return TickOutcome::Expired {
            next_player: state.current_player,
        };
    }

    state.time_left -= 1;
    TickOutcome::Ticked(state.time_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameState;

    #[test]
    fn countdown_decrements() {
        let mut state = GameState::new(3, 3, 10);
        assert_eq!(tick(&mut state), TickOutcome::Ticked(9));
        assert_eq!(tick(&mut state), TickOutcome::Ticked(8));
        assert_eq!(state.time_left, 8);
    }

    #[test]
    fn expiry_switches_turn_without_touching_the_board() {
        let mut state = GameState::new(3, 3, 2);
        let board_before = state.board.clone();

        assert_eq!(tick(&mut state), TickOutcome::Ticked(1));
        assert_eq!(
            tick(&mut state),
            TickOutcome::Expired {
                next_player: PlayerId::Two
            }
        );
        assert_eq!(state.current_player, PlayerId::Two);
        assert_eq!(state.time_left, state.turn_duration);
        assert_eq!(state.board, board_before);
    }

    #[test]
    fn pause_freezes_without_reset() {
        let mut state = GameState::new(3, 3, 10);
        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.time_left, 8);

        state.is_paused = true;
        assert_eq!(tick(&mut state), TickOutcome::Idle);
        assert_eq!(state.time_left, 8);

        state.is_paused = false;
        assert_eq!(tick(&mut state), TickOutcome::Ticked(7));
    }

    #[test]
    fn clock_stops_after_game_over() {
        let mut state = GameState::new(3, 3, 10);
        state.is_game_over = true;
        assert_eq!(tick(&mut state), TickOutcome::Idle);
        assert_eq!(state.time_left, 10);
    }
}
