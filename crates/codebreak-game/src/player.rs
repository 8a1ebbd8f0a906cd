//! Per-session player registry.

use codebreak_protocol::{PlayerId, ServerEvent};
use codebreak_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::GameError;
use crate::code::Code;

/// Sending half of a connection's bounded outbound queue. The gateway
/// task owns the connection and drains the receiving half.
pub type Outbox = mpsc::Sender<ServerEvent>;

/// One seated player.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    secret: Option<Code>,
    locked: bool,
    /// Join sequence number; lower joined earlier.
    joined: u64,
    connection: ConnectionId,
    /// `None` once the connection was cut off for falling behind.
    outbox: Option<Outbox>,
}

impl Player {
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Display name. Defaults to the identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> Option<&Code> {
        self.secret.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn joined(&self) -> u64 {
        self.joined
    }

    /// The connection that currently owns this seat.
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub(crate) fn outbox(&self) -> Option<&Outbox> {
        self.outbox.as_ref()
    }
}

/// How a join was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// A new seat was created.
    Taken,
    /// The player already had a seat; secret, lock and join position
    /// were kept and the connection replaced.
    Reclaimed,
}

/// The players of one session, kept in join order.
#[derive(Debug)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    capacity: usize,
    next_join: u64,
}

impl PlayerRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            players: Vec::with_capacity(capacity),
            capacity,
            next_join: 0,
        }
    }

    /// Seats `id` on `connection`, or moves an existing seat onto it.
    ///
    /// Returns `None` when `id` is new and every seat is taken.
    pub fn join(
        &mut self,
        id: PlayerId,
        connection: ConnectionId,
        outbox: Outbox,
    ) -> Option<Seat> {
        if let Some(player) = self.get_mut(&id) {
            // Dropping the old outbox ends the superseded connection.
            player.connection = connection;
            player.outbox = Some(outbox);
            return Some(Seat::Reclaimed);
        }
        if self.players.len() >= self.capacity {
            return None;
        }

        let joined = self.next_join;
        self.next_join += 1;
        self.players.push(Player {
            name: id.to_string(),
            id,
            secret: None,
            locked: false,
            joined,
            connection,
            outbox: Some(outbox),
        });
        Some(Seat::Taken)
    }

    /// Stores a new secret and unlocks it.
    ///
    /// # Errors
    /// [`GameError::UnknownPlayer`], or [`GameError::InvalidSecret`] if
    /// `raw` is not four distinct digits.
    pub fn set_secret(&mut self, id: &PlayerId, raw: &str) -> Result<(), GameError> {
        let secret = Code::parse(raw).map_err(|_| GameError::InvalidSecret);
        let player = self
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        player.secret = Some(secret?);
        player.locked = false;
        Ok(())
    }

    /// Finalizes the player's secret.
    ///
    /// # Errors
    /// [`GameError::UnknownPlayer`], or [`GameError::NoSecretSet`].
    pub fn lock_secret(&mut self, id: &PlayerId) -> Result<(), GameError> {
        let player = self
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        if player.secret.is_none() {
            return Err(GameError::NoSecretSet);
        }
        player.locked = true;
        Ok(())
    }

    /// Removes `id` if `connection` still owns its seat. Returns whether
    /// a player was removed.
    pub fn leave(&mut self, id: &PlayerId, connection: ConnectionId) -> bool {
        let before = self.players.len();
        self.players
            .retain(|p| !(p.id == *id && p.connection == connection));
        self.players.len() != before
    }

    /// Drops `id`'s outbox. Its gateway sees the queue close, ends the
    /// connection, and leaves through the usual path. Returns whether an
    /// outbox was dropped.
    pub fn cut_off(&mut self, id: &PlayerId) -> bool {
        self.get_mut(id)
            .and_then(|p| p.outbox.take())
            .is_some()
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *id)
    }

    /// Players in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Identifiers in join order (the roster).
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    /// The player with the lowest join sequence number.
    pub fn earliest_joined(&self) -> Option<&Player> {
        self.players.iter().min_by_key(|p| p.joined)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
