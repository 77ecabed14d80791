// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room codes and join links.
//!
//! A room is addressed by a human-shareable 4-digit code. The code maps
//! deterministically onto a channel address (a fixed namespace prefix plus
//! the code) and, for the TCP transport, onto a port offset. This is the
//! entire discovery mechanism; there is no matchmaking service.

use rand::Rng;
use thiserror::Error;

/// Namespace prefix for channel addresses
pub const ROOM_NAMESPACE: &str = "xodots-game-";

/// Query parameter carrying the code in a join link
const ROOM_QUERY_KEY: &str = "room";

/// Errors from parsing a room code
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomCodeError {
    #[error("room code must be exactly 4 digits")]
    Malformed,
}

/// A validated 4-digit room code (1000..=9999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomCode(u16);

impl RoomCode {
    /// Generate a fresh random code
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen_range(1000..10000))
    }

    /// Parse a code from user input
    pub fn parse(input: &str) -> Result<Self, RoomCodeError> {
        let input = input.trim();
        if input.len() != 4 || !input.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(RoomCodeError::Malformed);
        }
        let value: u16 = input.parse().map_err(|_| RoomCodeError::Malformed)?;
        if value < 1000 {
            return Err(RoomCodeError::Malformed);
        }
        Ok(Self(value))
    }

    /// The channel address this code maps to
    pub fn channel_address(&self) -> String {
        format!("{}{}", ROOM_NAMESPACE, self.0)
    }

    /// Port offset for the TCP transport (added to the configured base)
    pub fn port_offset(&self) -> u16 {
        self.0
    }

    /// Shareable join link: base URL plus the room query parameter
    pub fn join_link(&self, base_url: &str) -> String {
        format!("{}?{}={}", base_url, ROOM_QUERY_KEY, self.0)
    }

    /// Extract a room code from a join link's query string, consumed at
    /// startup to auto-populate the join flow.
    pub fn from_join_link(url: &str) -> Option<Self> {
        let query = url.split_once('?')?.1;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == ROOM_QUERY_KEY)
            .and_then(|(_, value)| Self::parse(value).ok())
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}
