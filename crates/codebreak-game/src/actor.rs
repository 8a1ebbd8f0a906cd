//! Session actor: an isolated Tokio task that owns one [`Session`].
//!
//! Every operation on a session is a command on its channel, processed
//! one at a time. That serializes both players' actions and keeps each
//! broadcast consistent with the change that caused it.

use codebreak_protocol::{PlayerId, SessionCode};
use codebreak_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::fanout::FanoutReport;
use crate::player::{Outbox, Seat};
use crate::session::{Move, Outcome, Session};
use crate::{GameError, SessionConfig, SessionState};

/// Commands sent to a session actor.
///
/// Each carries a `oneshot::Sender` the actor answers on.
enum SessionCommand {
    Join {
        player: PlayerId,
        connection: ConnectionId,
        outbox: Outbox,
        reply: oneshot::Sender<Result<Seat, GameError>>,
    },
    SetSecret {
        player: PlayerId,
        secret: String,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    LockSecret {
        player: PlayerId,
        reply: oneshot::Sender<Result<Option<PlayerId>, GameError>>,
    },
    Guess {
        player: PlayerId,
        guess: String,
        reply: oneshot::Sender<Result<Move, GameError>>,
    },
    Leave {
        player: PlayerId,
        connection: ConnectionId,
        reply: oneshot::Sender<LeaveOutcome>,
    },
    /// Stop the actor if nobody is seated. Answers whether it stopped.
    CloseIfEmpty { reply: oneshot::Sender<bool> },
    Info { reply: oneshot::Sender<SessionInfo> },
}

/// A snapshot of a session's public state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub code: SessionCode,
    pub state: SessionState,
    /// Join order.
    pub players: Vec<PlayerId>,
    pub turn: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub moves: usize,
}

/// Result of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// `false` if the seat was already gone or owned by a newer
    /// connection.
    pub removed: bool,
    /// The session has nobody left; the caller should ask the directory
    /// to remove it.
    pub now_empty: bool,
}

/// Handle to a running session actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    code: SessionCode,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    /// `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// `true` if both handles talk to the same actor.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Seats `player` on `connection`; events for it go to `outbox`.
    pub async fn join(
        &self,
        player: PlayerId,
        connection: ConnectionId,
        outbox: Outbox,
    ) -> Result<Seat, GameError> {
        self.request(|reply| SessionCommand::Join {
            player,
            connection,
            outbox,
            reply,
        })
        .await?
    }

    pub async fn set_secret(&self, player: PlayerId, secret: String) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::SetSecret {
            player,
            secret,
            reply,
        })
        .await?
    }

    /// Returns the turn holder if this lock started (or resumed) the game.
    pub async fn lock_secret(&self, player: PlayerId) -> Result<Option<PlayerId>, GameError> {
        self.request(|reply| SessionCommand::LockSecret { player, reply })
            .await?
    }

    pub async fn guess(&self, player: PlayerId, guess: String) -> Result<Move, GameError> {
        self.request(|reply| SessionCommand::Guess {
            player,
            guess,
            reply,
        })
        .await?
    }

    pub async fn leave(
        &self,
        player: PlayerId,
        connection: ConnectionId,
    ) -> Result<LeaveOutcome, GameError> {
        self.request(|reply| SessionCommand::Leave {
            player,
            connection,
            reply,
        })
        .await
    }

    /// Asks the actor to stop if it is empty.
    pub(crate) async fn close_if_empty(&self) -> Result<bool, GameError> {
        self.request(|reply| SessionCommand::CloseIfEmpty { reply })
            .await
    }

    pub async fn info(&self) -> Result<SessionInfo, GameError> {
        self.request(|reply| SessionCommand::Info { reply }).await
    }

    /// Sends a command and waits for its reply. A stopped actor (send
    /// or reply channel closed) is [`GameError::Unavailable`].
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| GameError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| GameError::Unavailable(self.code.clone()))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor {
    session: Session,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        let code = self.session.code().clone();
        tracing::info!(session = %code, "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Join {
                    player,
                    connection,
                    outbox,
                    reply,
                } => {
                    let result = self.session.join(player, connection, outbox);
                    let _ = reply.send(self.settle(result));
                }
                SessionCommand::SetSecret {
                    player,
                    secret,
                    reply,
                } => {
                    let result = self.session.set_secret(&player, &secret);
                    let _ = reply.send(self.settle(result));
                }
                SessionCommand::LockSecret { player, reply } => {
                    let result = self.session.lock_secret(&player);
                    let _ = reply.send(self.settle(result));
                }
                SessionCommand::Guess {
                    player,
                    guess,
                    reply,
                } => {
                    let result = self.session.submit_guess(&player, &guess);
                    let _ = reply.send(self.settle(result));
                }
                SessionCommand::Leave {
                    player,
                    connection,
                    reply,
                } => {
                    let outcome = self.session.leave(&player, connection);
                    self.log_fanout(&outcome.fanout);
                    let _ = reply.send(LeaveOutcome {
                        removed: outcome.value,
                        now_empty: self.session.is_empty(),
                    });
                }
                SessionCommand::CloseIfEmpty { reply } => {
                    let empty = self.session.is_empty();
                    let _ = reply.send(empty);
                    if empty {
                        break;
                    }
                }
                SessionCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(session = %code, "session actor stopped");
    }

    /// Logs the fan-out of a successful operation and strips it.
    fn settle<T>(&self, result: Result<Outcome<T>, GameError>) -> Result<T, GameError> {
        match result {
            Ok(outcome) => {
                self.log_fanout(&outcome.fanout);
                Ok(outcome.value)
            }
            Err(e) => {
                tracing::debug!(session = %self.session.code(), error = %e, "operation rejected");
                Err(e)
            }
        }
    }

    fn log_fanout(&self, report: &FanoutReport) {
        if report.dropped() > 0 {
            tracing::debug!(
                session = %self.session.code(),
                delivered = report.delivered(),
                dropped = report.dropped(),
                "broadcast partially delivered"
            );
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            code: self.session.code().clone(),
            state: self.session.state(),
            players: self.session.players().ids(),
            turn: self.session.turn().cloned(),
            winner: self.session.winner().cloned(),
            moves: self.session.history().len(),
        }
    }
}

/// Spawns a new session actor and returns a handle to it.
pub(crate) fn spawn_session(code: SessionCode, config: &SessionConfig) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer);

    let actor = SessionActor {
        session: Session::new(code.clone(), config),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    SessionHandle { code, sender: tx }
}
