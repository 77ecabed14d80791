// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session roles and authority checks.
//!
//! The host (always player 1) owns shared configuration and game start;
//! the guest owns only their own name. In local play both roles collapse
//! into one actor with full control. Checks run client-side before any
//! mutation: both peers are mutually trusted, so this guards against UI
//! bypass rather than a hostile peer. Tamper resistance is a non-goal.

use serde::{Deserialize, Serialize};
use xodots_core::PlayerId;

/// Peer role in a networked session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Room creator; logical player 1
    Host,
    /// Room joiner; logical player 2
    Guest,
}

impl Role {
    /// The player this role controls
    pub fn player(&self) -> PlayerId {
        match self {
            Role::Host => PlayerId::One,
            Role::Guest => PlayerId::Two,
        }
    }
}

/// Whether a session is local or networked, and as which role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Single-process play: no role restrictions
    Local,
    /// Connected to a peer as the given role
    Multiplayer(Role),
}

impl SessionMode {
    pub fn is_multiplayer(&self) -> bool {
        matches!(self, SessionMode::Multiplayer(_))
    }

    /// The player this side controls, or `None` when local (both)
    pub fn local_player(&self) -> Option<PlayerId> {
        match self {
            SessionMode::Local => None,
            SessionMode::Multiplayer(role) => Some(role.player()),
        }
    }

    /// Personal state: a side may only edit its own name in multiplayer
    pub fn can_edit_name(&self, player: PlayerId) -> bool {
        match self {
            SessionMode::Local => true,
            SessionMode::Multiplayer(role) => role.player() == player,
        }
    }

    /// Shared config: theme selection is host-only
    pub fn can_change_theme(&self) -> bool {
        self.is_host_or_local()
    }

    /// Shared config: symbol assignment is host-only
    pub fn can_assign_symbols(&self) -> bool {
        self.is_host_or_local()
    }

    /// Only the host may start the game unilaterally
    pub fn can_start_game(&self) -> bool {
        self.is_host_or_local()
    }

    /// A side may move only on its own turn in multiplayer
    pub fn can_move_as(&self, current_player: PlayerId) -> bool {
        match self.local_player() {
            None => true,
            Some(mine) => mine == current_player,
        }
    }

    fn is_host_or_local(&self) -> bool {
        !matches!(self, SessionMode::Multiplayer(Role::Guest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mode_has_full_control() {
        let mode = SessionMode::Local;
        assert!(mode.can_edit_name(PlayerId::One));
        assert!(mode.can_edit_name(PlayerId::Two));
        assert!(mode.can_change_theme());
        assert!(mode.can_assign_symbols());
        assert!(mode.can_start_game());
        assert!(mode.can_move_as(PlayerId::One));
        assert!(mode.can_move_as(PlayerId::Two));
        assert_eq!(mode.local_player(), None);
    }

    #[test]
    fn guest_owns_only_their_name() {
        let mode = SessionMode::Multiplayer(Role::Guest);
        assert!(!mode.can_edit_name(PlayerId::One));
        assert!(mode.can_edit_name(PlayerId::Two));
        assert!(!mode.can_change_theme());
        assert!(!mode.can_assign_symbols());
        assert!(!mode.can_start_game());
    }

    #[test]
    fn host_is_player_one_with_shared_config() {
        let mode = SessionMode::Multiplayer(Role::Host);
        assert_eq!(mode.local_player(), Some(PlayerId::One));
        assert!(mode.can_change_theme());
        assert!(mode.can_start_game());
        assert!(!mode.can_edit_name(PlayerId::Two));
    }

    #[test]
    fn turn_gating_follows_the_local_player() {
        let host = SessionMode::Multiplayer(Role::Host);
        assert!(host.can_move_as(PlayerId::One));
        assert!(!host.can_move_as(PlayerId::Two));

        let guest = SessionMode::Multiplayer(Role::Guest);
        assert!(guest.can_move_as(PlayerId::Two));
        assert!(!guest.can_move_as(PlayerId::One));
    }
}
