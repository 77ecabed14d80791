// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII rendering of the board and scoreboard.

use xodots_core::{GameState, Line, PlayerId, Players, Winner};

fn mark(owner: Option<PlayerId>, players: &Players) -> char {
    match owner {
        Some(id) => match players.get(id).symbol {
            xodots_core::Symbol::X => 'X',
            xodots_core::Symbol::O => 'O',
        },
        None => ' ',
    }
}

/// Render the lattice: dots, placed lines, and captured boxes marked with
/// the owner's symbol.
pub fn render_board(state: &GameState, players: &Players) -> String {
    let board = &state.board;
    let mut out = String::new();

    for r in 0..board.rows() {
        // Dot row with horizontal edges
        for c in 0..board.cols() {
            out.push('.');
            if c < board.cols() - 1 {
                if board.is_edge_owned(Line::horizontal(r, c)) {
                    out.push_str("---");
                } else {
                    out.push_str("   ");
                }
            }
        }
        out.push('\n');

        // Vertical edges and box interiors
        if r < board.rows() - 1 {
            for c in 0..board.cols() {
                if board.is_edge_owned(Line::vertical(r, c)) {
                    out.push('|');
                } else {
                    out.push(' ');
                }
                if c < board.cols() - 1 {
                    out.push(' ');
                    out.push(mark(board.box_owner(r, c), players));
                    out.push(' ');
                }
            }
            out.push('\n');
        }
    }
    out
}

/// One-line status: scores, whose turn, time left.
pub fn render_status(state: &GameState, players: &Players) -> String {
    if state.is_game_over {
        return match state.winner {
            Some(Winner::Player(id)) => format!("game over, winner: {}", players.get(id).name),
            Some(Winner::Draw) => "game over: draw".to_string(),
            None => "game over".to_string(),
        };
    }
    let turn = players.get(state.current_player).name.clone();
    let paused = if state.is_paused { " [paused]" } else { "" };
    format!(
        "{} ({}) {} - {} ({})  |  turn: {}  {}s left{}",
        players.one.name,
        players.one.symbol,
        players.one.score,
        players.two.score,
        players.two.symbol,
        turn,
        state.time_left,
        paused,
    )
}
