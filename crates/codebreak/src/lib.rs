//! # Codebreak
//!
//! Real-time two-player code-breaking server. Each player commits a
//! secret of four distinct digits; players alternate guessing the
//! other's secret and are told how many digits are right and how many
//! are in the right place. Four in place wins.
//!
//! Players connect over WebSocket to `/ws/{session}/{player}` (or
//! `/ws/{player}` for a server-generated session code) and exchange
//! `type`-tagged JSON records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codebreak::prelude::*;
//!
//! # async fn run() -> Result<(), CodebreakError> {
//! let server = CodebreakServer::builder()
//!     .bind("0.0.0.0:8000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::CodebreakError;
pub use server::{CodebreakServer, CodebreakServerBuilder};

/// Everything needed to start a server or talk to one in tests.
pub mod prelude {
    pub use crate::{CodebreakError, CodebreakServer, CodebreakServerBuilder};
    pub use codebreak_game::{GameError, SessionConfig, SessionDirectory, SessionState};
    pub use codebreak_protocol::{
        ClientMessage, Codec, JsonCodec, MoveRecord, PlayerId, ServerEvent, SessionCode,
    };
}
