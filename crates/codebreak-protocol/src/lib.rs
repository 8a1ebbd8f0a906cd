//! Wire protocol for Codebreak.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Identity** ([`PlayerId`], [`SessionCode`]): how a connection
//!   names its seat.
//! - **Messages** ([`ClientMessage`], [`ServerEvent`], [`MoveRecord`]):
//!   the `type`-tagged records that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those records are
//!   converted to/from bytes.
//!
//! The protocol layer knows nothing about connections or game rules.
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Game (sessions)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, ConnectAddress, MAX_IDENTIFIER_LEN, MoveRecord, PlayerId,
    ServerEvent, SessionCode,
};
