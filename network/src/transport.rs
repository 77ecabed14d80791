// SPDX-License-Identifier: MIT OR Apache-2.0

//! Peer transport: an ordered, reliable, bidirectional point-to-point
//! channel carrying wire messages.
//!
//! Connection brokering is an external concern; this module offers the
//! two concrete channels the rest of the crate needs: an in-process
//! loopback pair for local testing, and a one-shot TCP link framed as
//! newline-delimited JSON. Sends are fire-and-forget: no acknowledgment,
//! no backpressure, no retry. A failed connection attempt is terminal;
//! the user retries manually.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::protocol::{self, WireMessage};
use crate::room::RoomCode;

/// One end of a peer channel
pub struct PeerLink {
    /// Outbound messages; dropped silently once the peer is gone
    pub sender: mpsc::UnboundedSender<WireMessage>,
    /// Inbound messages; closes when the peer disconnects
    pub receiver: mpsc::UnboundedReceiver<WireMessage>,
}

impl PeerLink {
    /// Build a connected in-process pair, one end per peer. Used by tests
    /// and by local two-session demos in place of a real network.
    pub fn pair() -> (PeerLink, PeerLink) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            PeerLink {
                sender: a_tx,
                receiver: a_rx,
            },
            PeerLink {
                sender: b_tx,
                receiver: b_rx,
            },
        )
    }

    /// Fire-and-forget send. Returns false once the channel is closed.
    pub fn send(&self, message: WireMessage) -> bool {
        self.sender.send(message).is_ok()
    }
}

/// TCP address for a room: the code maps onto a port offset above the
/// configured base. Fails when the sum leaves the 16-bit port range.
pub fn room_addr(host: &str, base_port: u16, code: RoomCode) -> Result<String> {
    let port = base_port.checked_add(code.port_offset()).with_context(|| {
        format!(
            "base port {} puts room {} beyond port 65535",
            base_port, code
        )
    })?;
    Ok(format!("{}:{}", host, port))
}

/// Host a room: listen on the room's port and accept exactly one guest.
pub async fn host_room(bind_addr: &str, base_port: u16, code: RoomCode) -> Result<PeerLink> {
    let addr = room_addr(bind_addr, base_port, code)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("room {} unavailable (bind {})", code, addr))?;
    tracing::info!(%addr, room = %code, "hosting room, waiting for guest");

    let (stream, peer_addr) = listener
        .accept()
        .await
        .context("failed to accept guest connection")?;
    tracing::info!(%peer_addr, room = %code, "guest connected");
    Ok(spawn_bridge(stream))
}

/// Join a room hosted at the given address.
pub async fn join_room(host: &str, base_port: u16, code: RoomCode) -> Result<PeerLink> {
    let addr = room_addr(host, base_port, code)?;
    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("could not reach room {} at {}", code, addr))?;
    tracing::info!(%addr, room = %code, "connected to host");
    Ok(spawn_bridge(stream))
}

/// Bridge a TCP stream into a `PeerLink`: a writer task drains outbound
/// messages onto the socket, a reader task decodes inbound lines. Either
/// side ending closes the inbound channel, which the session surfaces as
/// a peer disconnect.
fn spawn_bridge(stream: TcpStream) -> PeerLink {
    let (read_half, mut write_half) = stream.into_split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WireMessage>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<WireMessage>();

    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let line = match protocol::encode(&message) {
                Ok(line) => line,
                Err(err) => {
                    tracing::error!(%err, "failed to encode wire message");
                    continue;
                }
            };
            if let Err(err) = write_half.write_all(line.as_bytes()).await {
                tracing::warn!(%err, "peer write failed, dropping outbound channel");
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    // Malformed lines are ignored, not fatal.
                    if let Some(message) = protocol::decode(&line) {
                        if in_tx.send(message).is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!("peer closed the connection");
                    break;
                }
                Err(err) => {
                    tracing::warn!(%err, "peer read failed");
                    break;
                }
            }
        }
        // in_tx drops here; the receiver sees the channel close.
    });

    PeerLink {
        sender: out_tx,
        receiver: in_rx,
    }
}
