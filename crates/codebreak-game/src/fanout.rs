//! Best-effort delivery of one event to many players.

use codebreak_protocol::{PlayerId, ServerEvent};
use tokio::sync::mpsc::error::TrySendError;

use crate::player::Player;

/// What happened to one recipient's copy of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued on the recipient's outbox.
    Delivered,
    /// The recipient's connection is gone or was cut off; its copy was
    /// discarded.
    Dropped,
    /// The recipient's outbox was full; its copy was discarded and the
    /// connection should be cut off.
    Stalled,
}

impl Delivery {
    /// `true` unless the event was queued.
    pub fn is_dropped(&self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

/// Per-recipient outcomes of one or more fan-outs.
///
/// A dropped recipient never fails the operation that produced the
/// event; the report exists so callers can see and log it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    outcomes: Vec<(PlayerId, Delivery)>,
}

impl FanoutReport {
    pub fn outcomes(&self) -> &[(PlayerId, Delivery)] {
        &self.outcomes
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|(_, d)| !d.is_dropped()).count()
    }

    /// Recipients that did not get their copy, stalled ones included.
    pub fn dropped(&self) -> usize {
        self.outcomes.iter().filter(|(_, d)| d.is_dropped()).count()
    }

    /// Recipients whose outbox was full.
    pub fn stalled(&self) -> impl Iterator<Item = &PlayerId> {
        self.outcomes
            .iter()
            .filter(|(_, d)| *d == Delivery::Stalled)
            .map(|(id, _)| id)
    }

    /// Appends another report's outcomes to this one.
    pub fn merge(&mut self, other: FanoutReport) {
        self.outcomes.extend(other.outcomes);
    }
}

/// Sends a clone of `event` to every player in `recipients`.
///
/// Uses `try_send`, so this never waits on a slow peer: a full outbox
/// is reported as [`Delivery::Stalled`] and the event is discarded.
pub(crate) fn fan_out<'a>(
    recipients: impl IntoIterator<Item = &'a Player>,
    event: &ServerEvent,
) -> FanoutReport {
    let mut report = FanoutReport::default();
    for player in recipients {
        let delivery = match player.outbox().map(|tx| tx.try_send(event.clone())) {
            Some(Ok(())) => Delivery::Delivered,
            Some(Err(TrySendError::Full(_))) => {
                tracing::debug!(
                    player = %player.id(),
                    conn_id = %player.connection(),
                    "outbox full, event dropped"
                );
                Delivery::Stalled
            }
            Some(Err(TrySendError::Closed(_))) | None => {
                tracing::debug!(
                    player = %player.id(),
                    conn_id = %player.connection(),
                    "recipient gone, event dropped"
                );
                Delivery::Dropped
            }
        };
        report.outcomes.push((player.id().clone(), delivery));
    }
    report
}
