//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, unknown `type`, missing
    /// or mistyped fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A player or session identifier broke the identifier rules.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// The connect address did not name a session and player.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
}
