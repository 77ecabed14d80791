// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move engine: validates and applies a move, detects box capture,
//! computes turn transfer and detects game end.

use crate::{GameState, Line, PlayerId, Players, Winner};

/// What a successfully applied move did. The engine performs no side
/// effects beyond the state mutation; the caller maps this outcome onto
/// events (click / win feedback, game-over notice) and onto the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Who placed the line
    pub by: PlayerId,
    /// The line that was placed
    pub line: Line,
    /// Boxes captured by this single move (0, 1 or 2)
    pub boxes_claimed: u32,
    /// Whether this move filled the board
    pub game_over: bool,
    /// Set iff `game_over`
    pub winner: Option<Winner>,
}

/// Validate and apply one move.
///
/// Returns `None` and leaves both arguments untouched when the move is
/// invalid: game paused or over, line out of bounds, or edge already
/// owned. Invalid moves are silent no-ops by design; nothing is emitted.
pub fn apply_move(
    state: &mut GameState,
    players: &mut Players,
    line: Line,
) -> Option<MoveOutcome> {
    if state.is_paused || state.is_game_over {
        return None;
    }
    let mover = state.current_player;
    if !state.board.set_edge(line, mover) {
        return None;
    }

    // Full rescan of unowned boxes. The lattice is small, and a single
    // edge can complete at most the two boxes it borders; the rescan
    // guarantees every newly completed box is attributed to the mover.
    let mut boxes_claimed = 0u32;
    let coords: Vec<(usize, usize)> = state.board.box_coords().collect();
    for (r, c) in coords {
        if state.board.box_owner(r, c).is_none() && state.board.box_edges_complete(r, c) {
            state.board.claim_box(r, c, mover);
            boxes_claimed += 1;
        }
    }

    players.get_mut(mover).score += boxes_claimed;

    // Bonus turn on capture: one continued turn regardless of how many
    // boxes this move closed. The clock resets on every transfer.
    if boxes_claimed == 0 {
        state.current_player = mover.other();
    }
    state.time_left = state.turn_duration;

    // Winner determination uses the just-updated scores.
    let game_over = state.board.is_full();
    let winner = if game_over {
        let (p1, p2) = (players.one.score, players.two.score);
        let winner = if p1 > p2 {
            Winner::Player(PlayerId::One)
        } else if p2 > p1 {
            Winner::Player(PlayerId::Two)
        } else {
            Winner::Draw
        };
        state.is_game_over = true;
        state.winner = Some(winner);
        Some(winner)
    } else {
        None
    };

    tracing::debug!(
        r = line.r,
        c = line.c,
        orientation = ?line.orientation,
        by = mover.number(),
        boxes_claimed,
        game_over,
        "applied move"
    );

    Some(MoveOutcome {
        by: mover,
        line,
        boxes_claimed,
        game_over,
        winner,
    })
}
