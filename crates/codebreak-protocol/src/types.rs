//! Core protocol types for Codebreak's wire format.
//!
//! Every record here is JSON with a `type` discriminator, which is what
//! the browser client switches on.

use std::fmt;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Longest accepted player identifier or session code, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// Identifiers double as display names, so any text is allowed except
/// `/` (the path separator) and control characters.
fn check_identifier(raw: &str) -> Result<(), ProtocolError> {
    let ok = !raw.trim().is_empty()
        && raw.chars().count() <= MAX_IDENTIFIER_LEN
        && !raw.chars().any(|c| c == '/' || c.is_control());
    if ok {
        Ok(())
    } else {
        Err(ProtocolError::InvalidIdentifier(raw.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier, chosen by the client and unique within a
/// session. It is also the player's display name.
///
/// On the wire it is a plain string (`"alice"`, not `{"0":"alice"}`);
/// deserializing goes through [`PlayerId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Validates and wraps a client-supplied identifier.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidIdentifier`] unless `raw` is 1 to
    /// [`MAX_IDENTIFIER_LEN`] characters, not all whitespace, with no
    /// `/` or control characters.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        check_identifier(raw)?;
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        check_identifier(&raw)?;
        Ok(Self(raw))
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The short, human-shareable code that names a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Validates and wraps a session code. Same rules as [`PlayerId::parse`].
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        check_identifier(raw)?;
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionCode {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        check_identifier(&raw)?;
        Ok(Self(raw))
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ConnectAddress
// ---------------------------------------------------------------------------

/// Where a connection asked to sit, taken from its request path.
///
/// ```text
/// /ws/{session}/{player}   join (or create) the named session
/// /ws/{player}             join a fresh session with a server-made code
/// ```
///
/// Segments are percent-decoded, so `/ws/ROOM/Alice%20Smith` seats
/// `Alice Smith`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAddress {
    /// `None` asks the server to generate a code.
    pub session: Option<SessionCode>,
    pub player: PlayerId,
}

impl ConnectAddress {
    /// Parses a request path.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidAddress`] for any other path shape or a
    /// segment that does not decode to UTF-8, or
    /// [`ProtocolError::InvalidIdentifier`] for a bad identifier.
    pub fn parse(path: &str) -> Result<Self, ProtocolError> {
        let invalid = || ProtocolError::InvalidAddress(path.to_owned());
        let rest = path.strip_prefix("/ws/").ok_or_else(invalid)?;
        let decode = |segment: &str| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|_| invalid())
        };
        let segments: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
        match segments.as_slice() {
            [player] => Ok(Self {
                session: None,
                player: PlayerId::try_from(decode(player)?)?,
            }),
            [session, player] => Ok(Self {
                session: Some(SessionCode::try_from(decode(session)?)?),
                player: PlayerId::try_from(decode(player)?)?,
            }),
            _ => Err(invalid()),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One scored guess, as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The guessing player.
    pub from: PlayerId,
    pub guess: String,
    /// Guessed digits present anywhere in the secret.
    pub correct_digits: u8,
    /// Guessed digits in the right place.
    pub correct_positions: u8,
}

/// Client → server.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` gives
/// `{"type":"set_secret","secret":"1234"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Commit or replace this player's secret. Unlocks it.
    ///
    /// A missing `secret` decodes as empty and fails validation like
    /// any other bad secret.
    SetSecret {
        #[serde(default)]
        secret: String,
    },
    /// Finalize the committed secret.
    LockSecret,
    /// Guess the opponent's secret.
    Guess {
        #[serde(default)]
        guess: String,
    },
    /// Leave the session and close the connection.
    Leave,
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent only to a connection that just took its seat.
    Welcome {
        session: SessionCode,
        player: PlayerId,
    },
    /// The seated players, in join order.
    Players { players: Vec<PlayerId> },
    /// A player set (`locked: false`) or locked (`locked: true`) a secret.
    PlayerUpdate { player: PlayerId, locked: bool },
    /// Both players are locked in; `turn` guesses first.
    GameStart { turn: PlayerId },
    /// A guess that did not win.
    GuessResult {
        entry: MoveRecord,
        turn: PlayerId,
        history: Vec<MoveRecord>,
    },
    /// The winning guess.
    GameOver {
        winner: PlayerId,
        entry: MoveRecord,
        history: Vec<MoveRecord>,
    },
    /// A rejected operation. Only the originator sees it.
    Error { message: String },
}
