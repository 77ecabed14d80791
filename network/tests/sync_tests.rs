// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-peer convergence tests over the in-process loopback channel.

use std::sync::Arc;
use std::time::Duration;

use xodots_network::{GameSession, PeerLink, Role, SessionMode, WireMessage};

use xodots_core::{GameEvent, Line, PlayerId, Symbol};

/// Host and guest sessions wired together over a loopback channel.
async fn connected_pair(rows: usize, cols: usize) -> (Arc<GameSession>, Arc<GameSession>) {
    let host = Arc::new(GameSession::with_board(
        SessionMode::Multiplayer(Role::Host),
        rows,
        cols,
        10,
    ));
    let guest = Arc::new(GameSession::with_board(
        SessionMode::Multiplayer(Role::Guest),
        rows,
        cols,
        10,
    ));

    let (host_link, guest_link) = PeerLink::pair();
    GameSession::attach_link(&host, host_link).await;
    GameSession::attach_link(&guest, guest_link).await;
    (host, guest)
}

/// Let the inbound pump tasks drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn replayed_move_reproduces_identical_state() {
    let (host, guest) = connected_pair(3, 3).await;

    host.play_line(Line::horizontal(0, 0)).await.unwrap().unwrap();
    settle().await;

    // Determinism: the replayed move yields bit-identical state.
    assert_eq!(host.game_state().await, guest.game_state().await);
    assert_eq!(host.players().await, guest.players().await);

    // And the guest can answer on its own turn.
    guest.play_line(Line::vertical(0, 0)).await.unwrap().unwrap();
    settle().await;
    assert_eq!(host.game_state().await, guest.game_state().await);
}

#[tokio::test]
async fn boards_converge_across_a_full_game() {
    let (host, guest) = connected_pair(2, 2).await;

    // Single box: three alternating moves, then the capture.
    host.play_line(Line::horizontal(0, 0)).await.unwrap().unwrap();
    settle().await;
    guest.play_line(Line::horizontal(1, 0)).await.unwrap().unwrap();
    settle().await;
    host.play_line(Line::vertical(0, 0)).await.unwrap().unwrap();
    settle().await;
    let outcome = guest
        .play_line(Line::vertical(0, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.boxes_claimed, 1);
    settle().await;

    let host_state = host.game_state().await;
    let guest_state = guest.game_state().await;
    assert_eq!(host_state, guest_state);
    assert!(host_state.is_game_over);
    assert_eq!(host.players().await.two.score, 1);
    assert_eq!(host.players().await, guest.players().await);
}

#[tokio::test]
async fn replay_does_not_echo_back() {
    let (host, guest) = connected_pair(3, 3).await;
    let mut host_events = host.subscribe();

    host.play_line(Line::horizontal(0, 0)).await.unwrap().unwrap();
    settle().await;

    // Exactly one MoveMade on the origin side: the guest's replay did
    // not come back over the wire.
    let mut move_events = 0;
    while let Ok(event) = host_events.try_recv() {
        if matches!(event, GameEvent::MoveMade { .. }) {
            move_events += 1;
        }
    }
    assert_eq!(move_events, 1);
    assert_eq!(host.game_state().await, guest.game_state().await);
}

#[tokio::test]
async fn name_theme_and_symbol_sync() {
    let (host, guest) = connected_pair(3, 3).await;

    guest.set_name(PlayerId::Two, "Nyx").await.unwrap();
    settle().await;
    host.set_name(PlayerId::One, "Ada").await.unwrap();
    host.set_theme("jungle").await.unwrap();
    host.assign_symbol(PlayerId::Two, Symbol::X).await.unwrap();
    settle().await;

    let guest_players = guest.players().await;
    assert_eq!(guest_players.one.name, "Ada");
    assert_eq!(guest_players.two.name, "Nyx");
    assert_eq!(guest_players.two.symbol, Symbol::X);
    assert_eq!(guest_players.one.symbol, Symbol::O);
    assert_eq!(guest.theme().await.id, "jungle");
    assert_eq!(host.players().await, guest_players);
}

#[tokio::test]
async fn unknown_theme_sync_is_ignored() {
    let (_host, guest) = connected_pair(3, 3).await;

    guest
        .handle_message(WireMessage::SyncTheme {
            theme_id: "vaporwave".into(),
        })
        .await;
    assert_eq!(guest.theme().await.id, "cyber");
}

#[tokio::test]
async fn start_game_resets_the_guest() {
    let (host, guest) = connected_pair(3, 3).await;

    host.play_line(Line::horizontal(0, 0)).await.unwrap().unwrap();
    settle().await;
    assert!(guest.game_state().await.board.is_edge_owned(Line::horizontal(0, 0)));

    host.start_game().await.unwrap();
    settle().await;

    let guest_state = guest.game_state().await;
    assert!(!guest_state.board.is_edge_owned(Line::horizontal(0, 0)));
    assert_eq!(guest_state.current_player, PlayerId::One);
}

#[tokio::test]
async fn restart_preserves_names_and_theme() {
    let (host, guest) = connected_pair(2, 2).await;

    host.set_name(PlayerId::One, "Ada").await.unwrap();
    host.set_theme("mall").await.unwrap();

    // Host takes the only box.
    host.play_line(Line::horizontal(0, 0)).await.unwrap().unwrap();
    settle().await;
    guest.play_line(Line::horizontal(1, 0)).await.unwrap().unwrap();
    settle().await;
    host.play_line(Line::vertical(0, 0)).await.unwrap().unwrap();
    settle().await;
    guest.play_line(Line::vertical(0, 1)).await.unwrap().unwrap();
    host.send_chat("gg").await;
    settle().await;
    assert_eq!(guest.players().await.two.score, 1);
    assert!(!guest.chat_messages().await.is_empty());

    guest.restart().await;
    settle().await;

    for session in [&host, &guest] {
        let state = session.game_state().await;
        let players = session.players().await;
        assert!(!state.is_game_over, "board should be fresh");
        assert_eq!(state.board.claimed_boxes(), 0);
        assert_eq!(players.one.score, 0);
        assert_eq!(players.two.score, 0);
        assert_eq!(players.one.name, "Ada");
        assert_eq!(session.theme().await.id, "mall");
        assert!(session.chat_messages().await.is_empty());
    }
}

#[tokio::test]
async fn chat_appends_on_both_sides() {
    let (host, guest) = connected_pair(3, 3).await;
    host.set_name(PlayerId::One, "Ada").await.unwrap();
    settle().await;

    host.send_chat("good luck").await;
    settle().await;

    let guest_chat = guest.chat_messages().await;
    assert_eq!(guest_chat.len(), 1);
    assert_eq!(guest_chat[0].sender, "Ada");
    assert_eq!(guest_chat[0].text, "good luck");
    assert!(!guest_chat[0].system);
}

#[tokio::test]
async fn peer_disconnect_is_surfaced() {
    let host = Arc::new(GameSession::with_board(
        SessionMode::Multiplayer(Role::Host),
        3,
        3,
        10,
    ));
    let (host_link, guest_link) = PeerLink::pair();
    GameSession::attach_link(&host, host_link).await;
    let mut events = host.subscribe();

    drop(guest_link);
    settle().await;

    let mut saw_disconnect = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, GameEvent::PeerDisconnected) {
            saw_disconnect = true;
        }
    }
    assert!(saw_disconnect);
}

#[tokio::test]
async fn disconnect_ends_the_session() {
    let host = Arc::new(GameSession::with_board(
        SessionMode::Multiplayer(Role::Host),
        3,
        3,
        10,
    ));
    let (host_link, guest_link) = PeerLink::pair();
    GameSession::attach_link(&host, host_link).await;

    drop(guest_link);
    settle().await;

    // A two-player session cannot continue one-sided: the game is over
    // with no winner, moves are rejected and the clock stays frozen.
    let state = host.game_state().await;
    assert!(state.is_game_over);
    assert_eq!(state.winner, None);

    assert!(host
        .play_line(Line::horizontal(0, 0))
        .await
        .unwrap()
        .is_none());
    host.tick().await;
    assert_eq!(host.game_state().await.time_left, state.time_left);
}
