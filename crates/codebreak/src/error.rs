//! Unified error type for the Codebreak server.

use codebreak_game::GameError;
use codebreak_protocol::ProtocolError;
use codebreak_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CodebreakError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, bad address).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game-level error (full session, invalid move, ...).
    #[error(transparent)]
    Game(#[from] GameError),
}
