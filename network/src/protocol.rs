// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire protocol: the discrete typed messages exchanged between peers.
//!
//! Each message is a complete, self-contained instruction; the receiver
//! replays it through the same state-transition code paths as a local
//! action, with emission suppressed. Delivery is assumed ordered and
//! exactly-once per the channel contract: there are no sequence numbers
//! and no deduplication, so a lossy transport silently desynchronizes the
//! two boards. That gap is a documented limitation, not handled here.

use serde::{Deserialize, Serialize};
use xodots_core::{Orientation, Players};

/// A message on the peer channel, tagged by the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireMessage {
    /// Overwrite the receiver's copy of one player's display name.
    #[serde(rename = "SYNC_PLAYERS")]
    SyncPlayers {
        /// Wire identity: 1 or 2
        id: u8,
        name: String,
    },

    /// Host to guest only: adopt the named theme if recognized.
    #[serde(rename = "SYNC_THEME")]
    SyncTheme {
        #[serde(rename = "themeId")]
        theme_id: String,
    },

    /// Host to guest only: replace both player records wholesale.
    #[serde(rename = "SYNC_SYMBOLS")]
    SyncSymbols { players: Players },

    /// Host to guest only: reset to a fresh game and enter play.
    #[serde(rename = "START_GAME")]
    StartGame,

    /// Apply exactly this edge through the move engine.
    #[serde(rename = "MOVE")]
    Move {
        r: usize,
        c: usize,
        orientation: Orientation,
    },

    /// Append a chat entry.
    #[serde(rename = "CHAT")]
    Chat { sender: String, text: String },

    /// Reset board, scores and chat; names and theme survive.
    #[serde(rename = "RESTART")]
    Restart,
}

/// Encode a message as one newline-terminated JSON line.
pub fn encode(message: &WireMessage) -> anyhow::Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode one line from the channel. Malformed or unknown lines yield
/// `None`; the caller logs and ignores them.
pub fn decode(line: &str) -> Option<WireMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(message) => Some(message),
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed wire message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xodots_core::PlayerId;

    #[test]
    fn type_discriminators_match_the_protocol() {
        let cases = [
            (
                WireMessage::SyncPlayers {
                    id: 2,
                    name: "Ada".into(),
                },
                "SYNC_PLAYERS",
            ),
            (
                WireMessage::SyncTheme {
                    theme_id: "jungle".into(),
                },
                "SYNC_THEME",
            ),
            (WireMessage::StartGame, "START_GAME"),
            (
                WireMessage::Move {
                    r: 3,
                    c: 1,
                    orientation: Orientation::Horizontal,
                },
                "MOVE",
            ),
            (
                WireMessage::Chat {
                    sender: "Ada".into(),
                    text: "gg".into(),
                },
                "CHAT",
            ),
            (WireMessage::Restart, "RESTART"),
        ];
        for (message, tag) in cases {
            let json: serde_json::Value =
                serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
            assert_eq!(json["type"], tag, "wrong tag for {:?}", message);
        }
    }

    #[test]
    fn move_orientation_uses_short_form() {
        let json = serde_json::to_string(&WireMessage::Move {
            r: 0,
            c: 4,
            orientation: Orientation::Vertical,
        })
        .unwrap();
        assert!(json.contains("\"orientation\":\"v\""), "{json}");
    }

    #[test]
    fn sync_symbols_round_trips_the_pair_record() {
        let mut players = Players::new("Host", "Guest");
        players.assign_symbol(PlayerId::Two, xodots_core::Symbol::X);
        players.two.score = 4;

        let line = encode(&WireMessage::SyncSymbols {
            players: players.clone(),
        })
        .unwrap();
        match decode(&line) {
            Some(WireMessage::SyncSymbols { players: decoded }) => {
                assert_eq!(decoded, players);
            }
            other => panic!("unexpected decode: {:?}", other),
        }
    }

    #[test]
    fn malformed_lines_are_ignored() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("not json"), None);
        assert_eq!(decode("{\"type\":\"NO_SUCH_MESSAGE\"}"), None);
    }
}
