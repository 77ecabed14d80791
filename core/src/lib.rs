// SPDX-License-Identifier: MIT OR Apache-2.0

//! XO Dots & Boxes Core - Game Rules and Board Logic
//!
//! This crate provides the core game functionality including:
//! - Dot-lattice board representation (lines and boxes)
//! - Move validation, box capture and turn transfer
//! - Turn clock transitions
//! - Chat log and theme registry

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod chat;
pub mod clock;
pub mod engine;
pub mod theme;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of dot rows on the lattice.
pub const GRID_ROWS: usize = 10;
/// Default number of dot columns on the lattice.
pub const GRID_COLS: usize = 8;
/// Default turn duration in seconds.
pub const TURN_DURATION: u32 = 10;

/// One of the two players. The player count is fixed at exactly two for
/// the lifetime of the system, so this is an enum rather than an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player 1 (the host in networked play)
    One,
    /// Player 2 (the guest in networked play)
    Two,
}

impl PlayerId {
    /// Returns the opposing player
    pub fn other(&self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Numeric identity (1 or 2) as used on the wire
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Parse a wire identity back into a player
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

/// Player mark. Exactly one player holds each symbol at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Returns the opposite symbol
    pub fn other(&self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// One player finished with strictly more boxes
    Player(PlayerId),
    /// Equal final scores
    Draw,
}

/// Orientation of an edge between two adjacent dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Connects two horizontally adjacent dots
    #[serde(rename = "h")]
    Horizontal,
    /// Connects two vertically adjacent dots
    #[serde(rename = "v")]
    Vertical,
}

/// A line coordinate: the atomic unit of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    /// Row on the dot lattice
    pub r: usize,
    /// Column on the dot lattice
    pub c: usize,
    /// Horizontal or vertical
    pub orientation: Orientation,
}

impl Line {
    /// Create a horizontal line
    pub fn horizontal(r: usize, c: usize) -> Self {
        Self {
            r,
            c,
            orientation: Orientation::Horizontal,
        }
    }

    /// Create a vertical line
    pub fn vertical(r: usize, c: usize) -> Self {
        Self {
            r,
            c,
            orientation: Orientation::Vertical,
        }
    }

    /// Check the line fits a lattice of the given dot dimensions
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        match self.orientation {
            Orientation::Horizontal => self.r < rows && self.c < cols - 1,
            Orientation::Vertical => self.r < rows - 1 && self.c < cols,
        }
    }
}

/// A player record: identity, display name, symbol and cumulative score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub symbol: Symbol,
    /// Count of boxes owned; non-decreasing until a reset
    pub score: u32,
}

/// The fixed two-player record. Deliberately two named fields rather than
/// a map: the player count never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub one: Player,
    pub two: Player,
}

impl Default for Players {
    fn default() -> Self {
        Self::new("Player 1", "Player 2")
    }
}

impl Players {
    /// Create a fresh pair with zero scores; player 1 holds X
    pub fn new(name_one: &str, name_two: &str) -> Self {
        Self {
            one: Player {
                id: PlayerId::One,
                name: name_one.to_string(),
                symbol: Symbol::X,
                score: 0,
            },
            two: Player {
                id: PlayerId::Two,
                name: name_two.to_string(),
                symbol: Symbol::O,
                score: 0,
            },
        }
    }

    /// Borrow a player record by identity
    pub fn get(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.one,
            PlayerId::Two => &self.two,
        }
    }

    /// Mutably borrow a player record by identity
    pub fn get_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::One => &mut self.one,
            PlayerId::Two => &mut self.two,
        }
    }

    /// Assign a symbol to one player, flipping the other so that exactly
    /// one player holds each symbol.
    pub fn assign_symbol(&mut self, id: PlayerId, symbol: Symbol) {
        self.get_mut(id).symbol = symbol;
        self.get_mut(id.other()).symbol = symbol.other();
    }

    /// Set a player's display name
    pub fn set_name(&mut self, id: PlayerId, name: &str) {
        self.get_mut(id).name = name.to_string();
    }

    /// Zero both scores (game restart)
    pub fn reset_scores(&mut self) {
        self.one.score = 0;
        self.two.score = 0;
    }
}

/// The state of a game in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board grids
    pub board: board::Board,
    /// Whose turn it is
    pub current_player: PlayerId,
    /// Seconds remaining in the current turn
    pub time_left: u32,
    /// Full turn duration the clock resets to
    pub turn_duration: u32,
    /// Countdown frozen while paused
    pub is_paused: bool,
    /// No further moves accepted once set
    pub is_game_over: bool,
    /// Set together with `is_game_over`
    pub winner: Option<Winner>,
}

impl GameState {
    /// Create a fresh game on a lattice of the given dot dimensions
    pub fn new(rows: usize, cols: usize, turn_duration: u32) -> Self {
        Self {
            board: board::Board::new(rows, cols),
            current_player: PlayerId::One,
            time_left: turn_duration,
            turn_duration,
            is_paused: false,
            is_game_over: false,
            winner: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GRID_ROWS, GRID_COLS, TURN_DURATION)
    }
}

/// Game events emitted during play, consumed by presentation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A line was placed (triggers click-style feedback)
    MoveMade {
        line: Line,
        by: PlayerId,
    },
    /// One or more boxes were captured this move (win-style feedback)
    BoxCompleted {
        by: PlayerId,
        count: u32,
    },
    /// The board filled up
    GameOver {
        winner: Winner,
    },
    /// The turn clock ran out with no move
    TurnExpired {
        next_player: PlayerId,
    },
    /// A chat entry was appended
    Chat(chat::ChatMessage),
    /// A fresh game started
    GameStarted,
    /// Board, scores and chat were reset
    GameReset,
    /// Names or symbols changed
    PlayersUpdated(Players),
    /// The active theme changed
    ThemeChanged {
        theme_id: String,
    },
    /// The remote peer went away; the session is over
    PeerDisconnected,
}

/// Errors surfaced by the session layer. Invalid moves inside the engine
/// are silent no-ops and never reach this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The edge already has an owner
    #[error("edge already taken")]
    EdgeTaken,

    /// The line does not fit the lattice
    #[error("line coordinate out of bounds")]
    OutOfBounds,

    /// The game is paused
    #[error("game is paused")]
    GamePaused,

    /// The game has ended
    #[error("game is over")]
    GameOver,

    /// It is the other player's turn
    #[error("not your turn")]
    NotYourTurn,

    /// The acting role may not perform this action
    #[error("not authorized for this action")]
    NotAuthorized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_round_trip() {
        assert_eq!(PlayerId::from_number(1), Some(PlayerId::One));
        assert_eq!(PlayerId::from_number(2), Some(PlayerId::Two));
        assert_eq!(PlayerId::from_number(3), None);
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other().number(), 1);
    }

    #[test]
    fn symbols_stay_exclusive() {
        let mut players = Players::default();
        assert_eq!(players.one.symbol, Symbol::X);
        assert_eq!(players.two.symbol, Symbol::O);

        players.assign_symbol(PlayerId::Two, Symbol::X);
        assert_eq!(players.two.symbol, Symbol::X);
        assert_eq!(players.one.symbol, Symbol::O);

        players.assign_symbol(PlayerId::One, Symbol::X);
        assert_eq!(players.one.symbol, Symbol::X);
        assert_eq!(players.two.symbol, Symbol::O);
    }

    #[test]
    fn line_bounds() {
        // 10x8 dots: horizontal lines span [0,10) x [0,7)
        assert!(Line::horizontal(9, 6).in_bounds(10, 8));
        assert!(!Line::horizontal(9, 7).in_bounds(10, 8));
        // vertical lines span [0,9) x [0,8)
        assert!(Line::vertical(8, 7).in_bounds(10, 8));
        assert!(!Line::vertical(9, 0).in_bounds(10, 8));
    }

    #[test]
    fn orientation_wire_form() {
        let h = serde_json::to_string(&Orientation::Horizontal).unwrap();
        let v = serde_json::to_string(&Orientation::Vertical).unwrap();
        assert_eq!(h, "\"h\"");
        assert_eq!(v, "\"v\"");
    }
}
