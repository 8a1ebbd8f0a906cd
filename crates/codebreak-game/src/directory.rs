//! Session directory: finds, creates, and retires session actors.

use codebreak_protocol::{MAX_IDENTIFIER_LEN, PlayerId, ProtocolError, SessionCode};
use codebreak_transport::ConnectionId;
use dashmap::DashMap;
use rand::Rng;

use crate::actor::spawn_session;
use crate::player::{Outbox, Seat};
use crate::{GameError, SessionConfig, SessionHandle};

/// Characters used in server-generated session codes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many times a join is retried when it lands on a session that
/// closed underneath it.
const JOIN_ATTEMPTS: usize = 3;

/// Every live session, keyed by code.
///
/// The map is sharded, and no shard lock is held across an `.await`, so
/// traffic on one session never waits on another.
pub struct SessionDirectory {
    sessions: DashMap<SessionCode, SessionHandle>,
    config: SessionConfig,
}

impl SessionDirectory {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the session for `code`, starting an empty one if there
    /// is none (or the previous one has stopped).
    pub fn get_or_create(&self, code: &SessionCode) -> SessionHandle {
        let mut entry = self.sessions.entry(code.clone()).or_insert_with(|| {
            tracing::info!(session = %code, "session created");
            spawn_session(code.clone(), &self.config)
        });
        if entry.is_closed() {
            tracing::info!(session = %code, "session recreated");
            *entry = spawn_session(code.clone(), &self.config);
        }
        entry.value().clone()
    }

    pub fn get(&self, code: &SessionCode) -> Option<SessionHandle> {
        self.sessions.get(code).map(|h| h.value().clone())
    }

    /// Seats `player` in session `code`, creating the session if needed.
    ///
    /// # Errors
    /// Whatever the session rejects the join with, typically
    /// [`GameError::SessionFull`].
    pub async fn join(
        &self,
        code: &SessionCode,
        player: &PlayerId,
        connection: ConnectionId,
        outbox: &Outbox,
    ) -> Result<(SessionHandle, Seat), GameError> {
        for _ in 0..JOIN_ATTEMPTS {
            let handle = self.get_or_create(code);
            match handle.join(player.clone(), connection, outbox.clone()).await {
                Ok(seat) => return Ok((handle, seat)),
                // Raced a close; the next get_or_create replaces it.
                Err(GameError::Unavailable(_)) => tokio::task::yield_now().await,
                Err(e) => return Err(e),
            }
        }
        Err(GameError::Unavailable(code.clone()))
    }

    /// Removes the session for `code` iff nobody is seated in it.
    /// Returns whether it was removed.
    ///
    /// The actor decides emptiness itself and stops in the same step, so
    /// a join can't slip in between the check and the removal.
    pub async fn remove_if_empty(&self, code: &SessionCode) -> bool {
        let Some(handle) = self.get(code) else {
            return false;
        };
        // Unavailable: it already stopped.
        let stopped = handle.close_if_empty().await.unwrap_or(true);
        if !stopped {
            return false;
        }

        let removed = self
            .sessions
            .remove_if(code, |_, h| h.same_session(&handle))
            .is_some();
        if removed {
            tracing::info!(session = %code, "session destroyed");
        }
        removed
    }

    /// A fresh random code not currently in use.
    pub fn generate_code(&self) -> Result<SessionCode, ProtocolError> {
        let len = self.config.code_length.clamp(1, MAX_IDENTIFIER_LEN);
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..len)
                .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            let code = SessionCode::parse(&raw)?;
            if !self.sessions.contains_key(&code) {
                return Ok(code);
            }
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn codes(&self) -> Vec<SessionCode> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
