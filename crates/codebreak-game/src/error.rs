//! Error types for the game layer.
//!
//! Every variant except [`GameError::Unavailable`] is a user-input or
//! game-state violation: it is reported to the originating connection
//! and leaves the session untouched. The display strings are what the
//! player reads.

use codebreak_protocol::{PlayerId, SessionCode};

/// Errors that can occur during session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The proposed secret is not four distinct digits.
    #[error("Invalid secret. Must be 4 unique digits.")]
    InvalidSecret,

    /// Lock requested before any secret was set.
    #[error("Set a valid secret before locking.")]
    NoSecretSet,

    /// The guesser does not hold the turn (or no game is running yet).
    #[error("Not your turn.")]
    NotYourTurn,

    /// The guess is not four distinct digits.
    #[error("Invalid guess.")]
    InvalidGuess,

    /// The guesser has nobody to play against.
    #[error("No opponent.")]
    NoOpponent,

    /// More than one possible opponent is seated.
    #[error("Too many players in session.")]
    TooManyPlayers,

    /// The opponent has no secret to guess yet.
    #[error("Opponent has not set secret.")]
    OpponentNotReady,

    /// The game already has a winner.
    #[error("Game over. Winner: {0}")]
    GameOver(PlayerId),

    /// Every seat in the session is taken.
    #[error("Session {0} is full.")]
    SessionFull(SessionCode),

    /// The player holds no seat in this session.
    #[error("Player {0} is not in this session.")]
    UnknownPlayer(PlayerId),

    /// The session's task has stopped (it emptied and closed).
    #[error("Session {0} is unavailable.")]
    Unavailable(SessionCode),
}
