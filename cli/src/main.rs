// SPDX-License-Identifier: MIT OR Apache-2.0

//! XO Dots & Boxes CLI - headless terminal client
//!
//! Plays a local two-seat game or connects to a peer over TCP. Primarily
//! used for integration testing and for playing without the UI.

mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use xodots_core::{GameEvent, Line, PlayerId, Symbol};
use xodots_network::{config, transport, GameSession, Role, RoomCode, SessionMode};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "xodots-cli", about = "XO Dots & Boxes command-line client", version)]
struct Args {
    /// Host a new room and wait for a guest
    #[clap(long, conflicts_with_all = ["join", "link"])]
    host: bool,

    /// Join a room by 4-digit code
    #[clap(long)]
    join: Option<String>,

    /// Join via a shareable link (the room code is read from the query)
    #[clap(long)]
    link: Option<String>,

    /// Your display name
    #[clap(short, long)]
    name: Option<String>,

    /// Dot rows on the lattice (minimum 2)
    #[clap(long, default_value_t = xodots_core::GRID_ROWS, value_parser = parse_lattice_dim)]
    rows: usize,

    /// Dot columns on the lattice (minimum 2)
    #[clap(long, default_value_t = xodots_core::GRID_COLS, value_parser = parse_lattice_dim)]
    cols: usize,
}

/// A lattice needs at least 2 dots per side to hold a single box.
fn parse_lattice_dim(input: &str) -> Result<usize, String> {
    let value: usize = input
        .parse()
        .map_err(|_| String::from("expected an integer"))?;
    if value < 2 {
        return Err(String::from("lattice dimensions must be at least 2"));
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = config::load_config().context("failed to load configuration")?;

    // Resolve the join code from either flag; --link mirrors consuming a
    // share URL at startup.
    let join_code = match (&args.join, &args.link) {
        (Some(code), _) => Some(RoomCode::parse(code).context("invalid room code")?),
        (None, Some(link)) => Some(
            RoomCode::from_join_link(link).context("link carries no valid room code")?,
        ),
        (None, None) => None,
    };

    let mode = if args.host {
        SessionMode::Multiplayer(Role::Host)
    } else if join_code.is_some() {
        SessionMode::Multiplayer(Role::Guest)
    } else {
        SessionMode::Local
    };

    let session = Arc::new(GameSession::with_board(
        mode,
        args.rows,
        args.cols,
        config.turn_duration_secs,
    ));

    if let Some(name) = &args.name {
        let me = mode.local_player().unwrap_or(PlayerId::One);
        session.set_name(me, name).await.ok();
    }

    let mut link_task = None;
    match mode {
        SessionMode::Multiplayer(Role::Host) => {
            let code = RoomCode::generate();
            println!("room code: {}", code);
            println!("join link: {}", code.join_link(&config.join_base_url));
            let link = transport::host_room(&config.host_addr, config.base_port, code)
                .await
                .context("failed to host room")?;
            link_task = Some(GameSession::attach_link(&session, link).await);
            println!("guest connected");
        }
        SessionMode::Multiplayer(Role::Guest) => {
            let code = join_code.expect("guest mode implies a code");
            let link = transport::join_room(&config.host_addr, config.base_port, code)
                .await
                .context("failed to join room")?;
            link_task = Some(GameSession::attach_link(&session, link).await);
            println!("connected to room {}", code);
        }
        SessionMode::Local => {
            println!("local game on a {}x{} lattice", args.rows, args.cols);
        }
    }

    let clock_task = GameSession::spawn_clock(&session);
    let mut printer_task = spawn_event_printer(&session);

    println!("commands: h R C | v R C | say TEXT | name NAME | theme ID | symbol X|O | start | restart | pause | board | quit");
    let state = session.game_state().await;
    let players = session.players().await;
    print!("{}", render::render_board(&state, &players));
    println!("{}", render::render_status(&state, &players));

    // The printer only finishes when the peer disconnects; either way
    // the session is done.
    let result = tokio::select! {
        result = command_loop(&session) => result,
        _ = &mut printer_task => Ok(()),
    };

    // Leaving tears down the clock and the channel; nothing drains.
    clock_task.abort();
    printer_task.abort();
    if let Some(task) = link_task {
        task.abort();
    }
    result
}

/// Receive the next event, skipping over lagged gaps in the broadcast
/// stream. `None` once the channel closes.
async fn next_event(events: &mut broadcast::Receiver<GameEvent>) -> Option<GameEvent> {
    loop {
        match events.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream lagged, catching up");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

fn spawn_event_printer(session: &Arc<GameSession>) -> tokio::task::JoinHandle<()> {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        let mut events = session.subscribe();
        while let Some(event) = next_event(&mut events).await {
            match event {
                GameEvent::MoveMade { line, by } => {
                    tracing::debug!(?line, by = by.number(), "move made");
                    let state = session.game_state().await;
                    let players = session.players().await;
                    print!("{}", render::render_board(&state, &players));
                    println!("{}", render::render_status(&state, &players));
                }
                GameEvent::BoxCompleted { by, count } => {
                    let players = session.players().await;
                    println!("{} captured {} box(es)!", players.get(by).name, count);
                }
                GameEvent::GameOver { winner } => match winner {
                    xodots_core::Winner::Player(id) => {
                        let players = session.players().await;
                        println!("*** winner: {} ***", players.get(id).name);
                    }
                    xodots_core::Winner::Draw => println!("*** draw ***"),
                },
                GameEvent::TurnExpired { next_player } => {
                    let players = session.players().await;
                    println!("time! turn passes to {}", players.get(next_player).name);
                }
                GameEvent::Chat(message) => {
                    println!("[{}] {}", message.sender, message.text);
                }
                GameEvent::GameStarted => println!("new game started"),
                GameEvent::GameReset => println!("game reset"),
                GameEvent::PlayersUpdated(players) => {
                    println!(
                        "players: {} ({}) vs {} ({})",
                        players.one.name, players.one.symbol, players.two.name, players.two.symbol
                    );
                }
                GameEvent::ThemeChanged { theme_id } => println!("theme: {}", theme_id),
                GameEvent::PeerDisconnected => {
                    println!("opponent disconnected, session over");
                    break;
                }
            }
        }
    })
}

async fn command_loop(session: &Arc<GameSession>) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(input) = lines.next_line().await? {
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
        match command {
            "h" | "v" => {
                let Some(line) = parse_line(command, rest) else {
                    println!("usage: {} ROW COL", command);
                    continue;
                };
                match session.play_line(line).await {
                    Ok(Some(_)) => {}
                    Ok(None) => println!("invalid move"),
                    Err(err) => println!("{}", err),
                }
            }
            "say" => session.send_chat(rest).await,
            "name" => {
                let me = session
                    .mode()
                    .await
                    .local_player()
                    .unwrap_or(session.game_state().await.current_player);
                if let Err(err) = session.set_name(me, rest).await {
                    println!("{}", err);
                }
            }
            "theme" => match session.set_theme(rest).await {
                Ok(true) => {}
                Ok(false) => println!("unknown theme: {}", rest),
                Err(err) => println!("{}", err),
            },
            "symbol" => {
                let symbol = match rest.trim() {
                    "X" | "x" => Symbol::X,
                    "O" | "o" => Symbol::O,
                    other => {
                        println!("unknown symbol: {}", other);
                        continue;
                    }
                };
                let me = session.mode().await.local_player().unwrap_or(PlayerId::One);
                if let Err(err) = session.assign_symbol(me, symbol).await {
                    println!("{}", err);
                }
            }
            "start" => {
                if let Err(err) = session.start_game().await {
                    println!("{}", err);
                }
            }
            "restart" => session.restart().await,
            "pause" => {
                let paused = session.toggle_pause().await;
                println!("{}", if paused { "paused" } else { "resumed" });
            }
            "board" => {
                let state = session.game_state().await;
                let players = session.players().await;
                print!("{}", render::render_board(&state, &players));
                println!("{}", render::render_status(&state, &players));
            }
            "quit" | "exit" => return Ok(()),
            other => println!("unknown command: {}", other),
        }
    }
    Ok(())
}

fn parse_line(orientation: &str, rest: &str) -> Option<Line> {
    let mut parts = rest.split_whitespace();
    let r: usize = parts.next()?.parse().ok()?;
    let c: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    match orientation {
        "h" => Some(Line::horizontal(r, c)),
        "v" => Some(Line::vertical(r, c)),
        _ => None,
    }
}
