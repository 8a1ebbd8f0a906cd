//! Game layer for Codebreak.
//!
//! Each session runs as an isolated Tokio task (actor model) that owns
//! its players, turn pointer, move history and winner.
//!
//! # Key types
//!
//! - [`Code`], [`score`], [`validate`]: secrets, guesses and scoring
//! - [`PlayerRegistry`]: the seated players of one session
//! - [`Session`]: the turn state machine
//! - [`SessionHandle`]: send commands to a running session actor
//! - [`SessionDirectory`]: creates, finds, and retires sessions
//! - [`FanoutReport`]: per-recipient delivery outcomes of a broadcast

mod actor;
mod code;
mod config;
mod directory;
mod error;
mod fanout;
mod player;
mod session;

pub use actor::{LeaveOutcome, SessionHandle, SessionInfo};
pub use code::{CODE_LEN, Code, CodeError, Score, score, validate};
pub use config::{SessionConfig, SessionState};
pub use directory::SessionDirectory;
pub use error::GameError;
pub use fanout::{Delivery, FanoutReport};
pub use player::{Outbox, Player, PlayerRegistry, Seat};
pub use session::{Move, Outcome, PLAYERS_PER_GAME, Session};
