// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game session: one client's authoritative state plus the sync glue.
//!
//! All state transitions (local actions, incoming wire messages, clock
//! ticks) funnel through a single mutex-guarded reducer, so no two
//! transitions ever interleave within one client. A locally originated
//! action is applied first and then serialized onto the channel; a
//! received message replays through the exact same code paths with
//! emission suppressed, so there is no re-broadcast loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use xodots_core::chat::{ChatLog, ChatMessage};
use xodots_core::engine::{self, MoveOutcome};
use xodots_core::theme::{self, Theme};
use xodots_core::{clock, GameError, GameEvent, GameState, Line, PlayerId, Players, Symbol};

use crate::protocol::WireMessage;
use crate::session::SessionMode;
use crate::transport::PeerLink;

/// Everything guarded by the session mutex
struct SessionState {
    mode: SessionMode,
    game: GameState,
    players: Players,
    chat: ChatLog,
    theme: Theme,
    /// Fire-and-forget outbound channel; `None` in local play or after
    /// a disconnect
    outbound: Option<mpsc::UnboundedSender<WireMessage>>,
    /// Lattice dimensions used for every fresh game
    rows: usize,
    cols: usize,
    turn_duration: u32,
}

impl SessionState {
    fn fresh_game(&self) -> GameState {
        GameState::new(self.rows, self.cols, self.turn_duration)
    }

    fn send(&self, message: WireMessage) {
        if let Some(outbound) = &self.outbound {
            // No ack, no retry: a closed channel just drops the message.
            if outbound.send(message).is_err() {
                tracing::warn!("outbound channel closed, message dropped");
            }
        }
    }
}

/// A running game session, local or networked
pub struct GameSession {
    inner: Mutex<SessionState>,
    events_tx: broadcast::Sender<GameEvent>,
    /// Keep a receiver alive to prevent channel closure
    _events_rx: broadcast::Receiver<GameEvent>,
}

impl GameSession {
    /// Create a session on the default 10x8 lattice
    pub fn new(mode: SessionMode) -> Self {
        Self::with_board(mode, xodots_core::GRID_ROWS, xodots_core::GRID_COLS, xodots_core::TURN_DURATION)
    }

    /// Create a session with explicit lattice dimensions and turn length
    pub fn with_board(mode: SessionMode, rows: usize, cols: usize, turn_duration: u32) -> Self {
        let (events_tx, events_rx) = broadcast::channel(100);
        Self {
            inner: Mutex::new(SessionState {
                mode,
                game: GameState::new(rows, cols, turn_duration),
                players: Players::default(),
                chat: ChatLog::new(),
                theme: theme::default_theme(),
                outbound: None,
                rows,
                cols,
                turn_duration,
            }),
            events_tx,
            _events_rx: events_rx,
        }
    }

    /// Get a receiver for game events
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events_tx.subscribe()
    }

    fn emit(&self, event: GameEvent) {
        // Only fails when presentation dropped every receiver; harmless.
        let _ = self.events_tx.send(event);
    }

    // --- snapshots for presentation ---------------------------------

    pub async fn game_state(&self) -> GameState {
        self.inner.lock().await.game.clone()
    }

    pub async fn players(&self) -> Players {
        self.inner.lock().await.players.clone()
    }

    pub async fn chat_messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.chat.messages().to_vec()
    }

    pub async fn theme(&self) -> Theme {
        self.inner.lock().await.theme
    }

    pub async fn mode(&self) -> SessionMode {
        self.inner.lock().await.mode
    }

    // --- channel wiring ---------------------------------------------

    /// Attach a peer channel. The inbound pump task replays received
    /// messages through the shared reducer until the peer disconnects,
    /// at which point the game is marked over and `PeerDisconnected`
    /// fires; a two-player session cannot continue one-sided.
    pub async fn attach_link(session: &Arc<Self>, link: PeerLink) -> JoinHandle<()> {
        let PeerLink {
            sender,
            mut receiver,
        } = link;
        {
            let mut inner = session.inner.lock().await;
            inner.outbound = Some(sender);
        }

        let session = Arc::clone(session);
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                session.handle_message(message).await;
            }
            tracing::info!("peer channel closed");
            {
                let mut inner = session.inner.lock().await;
                inner.outbound = None;
                // Ends the session: no further moves, clock goes idle.
                inner.game.is_game_over = true;
            }
            session.emit(GameEvent::PeerDisconnected);
        })
    }

    /// Start the 1-second turn-clock driver. The session owns no ambient
    /// timer; the caller holds the handle and aborts it on teardown.
    pub fn spawn_clock(session: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(session);
        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                session.tick().await;
            }
        })
    }

    // --- local actions ----------------------------------------------

    /// Submit a locally originated move. Applied locally first, then
    /// sent; the origin never waits on the network for its own view.
    /// Returns `Ok(None)` for engine-level rejections (edge taken,
    /// paused, over), which are silent no-ops.
    pub async fn play_line(&self, line: Line) -> Result<Option<MoveOutcome>, GameError> {
        let mut inner = self.inner.lock().await;
        if !inner.mode.can_move_as(inner.game.current_player) {
            return Err(GameError::NotYourTurn);
        }
        Ok(self.apply_line(&mut inner, line, true))
    }

    /// Apply one 1-second clock tick. Timeouts are not synchronized over
    /// the wire: both clients run the same countdown against the same
    /// state and expire identically.
    pub async fn tick(&self) {
        let mut inner = self.inner.lock().await;
        if let clock::TickOutcome::Expired { next_player } = clock::tick(&mut inner.game) {
            drop(inner);
            self.emit(GameEvent::TurnExpired { next_player });
        }
    }

    /// Append and broadcast a chat line from this side
    pub async fn send_chat(&self, text: &str) {
        let mut inner = self.inner.lock().await;
        let sender_id = inner
            .mode
            .local_player()
            .unwrap_or(inner.game.current_player);
        let sender = inner.players.get(sender_id).name.clone();
        let message = inner.chat.push(&sender, text);
        inner.send(WireMessage::Chat {
            sender,
            text: text.to_string(),
        });
        drop(inner);
        self.emit(GameEvent::Chat(message));
    }

    /// Rename a player. Multiplayer sides may only rename themselves.
    pub async fn set_name(&self, id: PlayerId, name: &str) -> Result<(), GameError> {
        let mut inner = self.inner.lock().await;
        if !inner.mode.can_edit_name(id) {
            return Err(GameError::NotAuthorized);
        }
        inner.players.set_name(id, name);
        inner.send(WireMessage::SyncPlayers {
            id: id.number(),
            name: name.to_string(),
        });
        let players = inner.players.clone();
        drop(inner);
        self.emit(GameEvent::PlayersUpdated(players));
        Ok(())
    }

    /// Select a theme (host-only in multiplayer). Unknown ids are
    /// ignored and leave the current theme in place.
    pub async fn set_theme(&self, theme_id: &str) -> Result<bool, GameError> {
        let mut inner = self.inner.lock().await;
        if !inner.mode.can_change_theme() {
            return Err(GameError::NotAuthorized);
        }
        let Some(theme) = theme::find(theme_id) else {
            tracing::debug!(theme_id, "unknown theme id, keeping current");
            return Ok(false);
        };
        inner.theme = theme;
        inner.send(WireMessage::SyncTheme {
            theme_id: theme_id.to_string(),
        });
        drop(inner);
        self.emit(GameEvent::ThemeChanged {
            theme_id: theme_id.to_string(),
        });
        Ok(true)
    }

    /// Assign a symbol to one player (host-only in multiplayer); the
    /// other player takes the opposite symbol and the whole pair record
    /// is synced wholesale.
    pub async fn assign_symbol(&self, id: PlayerId, symbol: Symbol) -> Result<(), GameError> {
        let mut inner = self.inner.lock().await;
        if !inner.mode.can_assign_symbols() {
            return Err(GameError::NotAuthorized);
        }
        inner.players.assign_symbol(id, symbol);
        let players = inner.players.clone();
        inner.send(WireMessage::SyncSymbols {
            players: players.clone(),
        });
        drop(inner);
        self.emit(GameEvent::PlayersUpdated(players));
        Ok(())
    }

    /// Start a fresh game (host-only in multiplayer)
    pub async fn start_game(&self) -> Result<(), GameError> {
        let mut inner = self.inner.lock().await;
        if !inner.mode.can_start_game() {
            return Err(GameError::NotAuthorized);
        }
        inner.game = inner.fresh_game();
        inner.send(WireMessage::StartGame);
        drop(inner);
        self.emit(GameEvent::GameStarted);
        Ok(())
    }

    /// Rematch: either side may restart. Board, scores and chat reset;
    /// names and theme survive.
    pub async fn restart(&self) {
        let mut inner = self.inner.lock().await;
        self.reset(&mut inner);
        inner.send(WireMessage::Restart);
    }

    /// Toggle pause. A purely local affordance; the protocol carries no
    /// pause message.
    pub async fn toggle_pause(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.game.is_paused = !inner.game.is_paused;
        inner.game.is_paused
    }

    // --- incoming messages ------------------------------------------

    /// Replay one received message through the same state-transition
    /// entry points as local actions, with emission suppressed.
    pub async fn handle_message(&self, message: WireMessage) {
        let mut inner = self.inner.lock().await;
        match message {
            WireMessage::SyncPlayers { id, name } => {
                let Some(player) = PlayerId::from_number(id) else {
                    tracing::warn!(id, "SYNC_PLAYERS with unknown player id, ignoring");
                    return;
                };
                inner.players.set_name(player, &name);
                let players = inner.players.clone();
                drop(inner);
                self.emit(GameEvent::PlayersUpdated(players));
            }
            WireMessage::SyncTheme { theme_id } => {
                let Some(theme) = theme::find(&theme_id) else {
                    tracing::debug!(theme_id, "unrecognized theme sync, ignoring");
                    return;
                };
                inner.theme = theme;
                drop(inner);
                self.emit(GameEvent::ThemeChanged { theme_id });
            }
            WireMessage::SyncSymbols { players } => {
                inner.players = players.clone();
                drop(inner);
                self.emit(GameEvent::PlayersUpdated(players));
            }
            WireMessage::StartGame => {
                inner.game = inner.fresh_game();
                drop(inner);
                self.emit(GameEvent::GameStarted);
            }
            WireMessage::Move { r, c, orientation } => {
                let line = Line { r, c, orientation };
                if self.apply_line(&mut inner, line, false).is_none() {
                    // The peer sent a move our engine rejects: the boards
                    // have diverged. Not recoverable here.
                    tracing::warn!(?line, "received move was rejected; boards may be desynchronized");
                }
            }
            WireMessage::Chat { sender, text } => {
                let message = inner.chat.push(&sender, &text);
                drop(inner);
                self.emit(GameEvent::Chat(message));
            }
            WireMessage::Restart => {
                self.reset(&mut inner);
            }
        }
    }

    // --- shared transitions -----------------------------------------

    /// The single move path for both origins. `emit_to_peer` is true for
    /// local moves only; replayed moves never go back on the wire.
    fn apply_line(
        &self,
        inner: &mut SessionState,
        line: Line,
        emit_to_peer: bool,
    ) -> Option<MoveOutcome> {
        let outcome = engine::apply_move(&mut inner.game, &mut inner.players, line)?;

        if emit_to_peer {
            inner.send(WireMessage::Move {
                r: line.r,
                c: line.c,
                orientation: line.orientation,
            });
        }

        self.emit(GameEvent::MoveMade {
            line,
            by: outcome.by,
        });
        if outcome.boxes_claimed > 0 {
            self.emit(GameEvent::BoxCompleted {
                by: outcome.by,
                count: outcome.boxes_claimed,
            });
        }
        if let Some(winner) = outcome.winner {
            self.emit(GameEvent::GameOver { winner });
        }
        Some(outcome)
    }

    fn reset(&self, inner: &mut SessionState) {
        inner.game = inner.fresh_game();
        inner.players.reset_scores();
        inner.chat.clear();
        self.emit(GameEvent::GameReset);
    }
}
