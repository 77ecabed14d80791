// SPDX-License-Identifier: MIT OR Apache-2.0

//! XO Dots & Boxes Network - peer synchronization layer
//!
//! This crate provides the networking functionality including:
//! - The wire protocol for keeping two clients' game state converged
//! - Session roles (host/guest) and client-side authority checks
//! - Room codes, join links and the point-to-point peer transport
//! - The game session tying the core engine to channel and clock

#![deny(unsafe_code)]

pub mod config;
pub mod game_session;
pub mod protocol;
pub mod room;
pub mod session;
pub mod transport;

// Re-exports
pub use config::{load_config, save_config, NetworkConfig};
pub use game_session::GameSession;
pub use protocol::WireMessage;
pub use room::RoomCode;
pub use session::{Role, SessionMode};
pub use transport::PeerLink;
