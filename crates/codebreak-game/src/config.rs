//! Session configuration and lifecycle states.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every session in a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seats per session. The guessing rules assume exactly one
    /// opponent, so anything but 2 only makes sense in tests.
    pub max_players: usize,

    /// Capacity of each session task's command channel.
    pub command_buffer: usize,

    /// Length of server-generated session codes.
    pub code_length: usize,

    /// Events queued per connection before it counts as stalled and is
    /// cut off.
    pub outbox_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_players: 2,
            command_buffer: 64,
            code_length: 6,
            outbox_capacity: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a session is in its game.
///
/// ```text
/// Forming ──(two players locked)──→ Active ──(4 in place)──→ Finished
///    ↑                                 │
///    └──────(a player leaves)──────────┘
/// ```
///
/// - **Forming**: no turn holder. Players join and commit secrets.
/// - **Active**: exactly one player holds the turn.
/// - **Finished**: a winner is recorded. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Forming,
    Active,
    Finished,
}

impl SessionState {
    /// Returns `true` once the game has a winner.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forming => write!(f, "Forming"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_is_finished() {
        assert!(!SessionState::Forming.is_finished());
        assert!(!SessionState::Active.is_finished());
        assert!(SessionState::Finished.is_finished());
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Forming.to_string(), "Forming");
        assert_eq!(SessionState::Finished.to_string(), "Finished");
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.max_players, 2);
        assert_eq!(config.command_buffer, 64);
        assert_eq!(config.code_length, 6);
        assert_eq!(config.outbox_capacity, 64);
    }
}
