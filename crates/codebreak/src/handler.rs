//! Per-connection gateway: seat the player, then shuttle messages.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Parse the request path → session code + player id
//!   2. Join the session (creating it if needed) → `welcome`
//!   3. Loop: inbound frames → session commands; the player's outbox →
//!      outbound frames
//!   4. On exit, leave the session and retire it if it emptied

use std::sync::Arc;

use codebreak_game::{GameError, SessionDirectory, SessionHandle};
use codebreak_protocol::{
    ClientMessage, Codec, ConnectAddress, PlayerId, ServerEvent, SessionCode,
};
use codebreak_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::CodebreakError;
use crate::server::ServerState;

/// Drop guard that gives up the player's seat when the handler exits.
///
/// Runs on every exit path (leave, close, error, panic). `Drop` is
/// synchronous, so the async cleanup is spawned.
struct SeatGuard {
    session: SessionCode,
    player: PlayerId,
    connection: ConnectionId,
    handle: SessionHandle,
    directory: Arc<SessionDirectory>,
}

impl Drop for SeatGuard {
    fn drop(&mut self) {
        let session = self.session.clone();
        let player = self.player.clone();
        let connection = self.connection;
        let handle = self.handle.clone();
        let directory = Arc::clone(&self.directory);
        tokio::spawn(async move {
            match handle.leave(player, connection).await {
                Ok(out) if out.now_empty => {
                    directory.remove_if_empty(&session).await;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(%session, error = %e, "leave failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), CodebreakError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, path = conn.path(), "handling new connection");

    // --- Step 1: Address ---
    let address = match ConnectAddress::parse(conn.path()) {
        Ok(address) => address,
        Err(e) => {
            reject(&conn, &state.codec, &e.to_string()).await;
            return Err(e.into());
        }
    };
    let session = match address.session {
        Some(code) => code,
        None => state.directory.generate_code()?,
    };
    let player = address.player;

    // --- Step 2: Seat ---
    let (outbox, mut inbox) = mpsc::channel(state.directory.config().outbox_capacity.max(1));
    let (handle, seat) = match state
        .directory
        .join(&session, &player, conn_id, &outbox)
        .await
    {
        Ok(joined) => joined,
        Err(e) => {
            reject(&conn, &state.codec, &e.to_string()).await;
            return Err(e.into());
        }
    };
    // The session holds the only sender now; when it lets go (a newer
    // connection took the seat, or this one fell behind) the inbox
    // closes.
    drop(outbox);

    let _guard = SeatGuard {
        session: session.clone(),
        player: player.clone(),
        connection: conn_id,
        handle: handle.clone(),
        directory: Arc::clone(&state.directory),
    };
    tracing::info!(%conn_id, %session, %player, ?seat, "player seated");

    send_event(
        &conn,
        &state.codec,
        &ServerEvent::Welcome {
            session: session.clone(),
            player: player.clone(),
        },
    )
    .await?;

    // --- Step 3: Message loop ---
    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Ok(Some(data)) => {
                    let keep_open =
                        handle_frame(&conn, &state.codec, &handle, &player, &data).await?;
                    if !keep_open {
                        break;
                    }
                }
                Ok(None) => {
                    tracing::info!(%session, %player, "connection closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%session, %player, error = %e, "recv error");
                    break;
                }
            },
            outbound = inbox.recv() => match outbound {
                Some(event) => {
                    if let Err(e) = send_event(&conn, &state.codec, &event).await {
                        tracing::debug!(%session, %player, error = %e, "send failed");
                        break;
                    }
                }
                None => {
                    tracing::info!(%session, %player, %conn_id, "outbox closed: superseded or cut off");
                    break;
                }
            },
        }
    }

    let _ = conn.close().await;
    // _guard drops here → leave + remove_if_empty.
    Ok(())
}

/// Decodes and dispatches one inbound frame. Returns `false` when the
/// connection should close.
async fn handle_frame<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    handle: &SessionHandle,
    player: &PlayerId,
    data: &[u8],
) -> Result<bool, CodebreakError> {
    let msg: ClientMessage = match codec.decode(data) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(%player, error = %e, "failed to decode message");
            send_error(conn, codec, &format!("Malformed message: {e}")).await?;
            return Ok(true);
        }
    };

    let result = match msg {
        ClientMessage::SetSecret { secret } => handle.set_secret(player.clone(), secret).await,
        ClientMessage::LockSecret => handle.lock_secret(player.clone()).await.map(|_| ()),
        ClientMessage::Guess { guess } => handle.guess(player.clone(), guess).await.map(|_| ()),
        ClientMessage::Leave => {
            tracing::info!(session = %handle.code(), %player, "player asked to leave");
            return Ok(false);
        }
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            send_error(conn, codec, &e.to_string()).await?;
            Ok(!matches!(e, GameError::Unavailable(_)))
        }
    }
}

/// Sends one event to this connection only.
async fn send_event<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    event: &ServerEvent,
) -> Result<(), CodebreakError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await?;
    Ok(())
}

async fn send_error<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    message: &str,
) -> Result<(), CodebreakError> {
    send_event(
        conn,
        codec,
        &ServerEvent::Error {
            message: message.to_string(),
        },
    )
    .await
}

/// Best-effort error and close for a connection that never got a seat.
async fn reject<C: Codec>(conn: &WebSocketConnection, codec: &C, message: &str) {
    if let Err(e) = send_error(conn, codec, message).await {
        tracing::debug!(conn_id = %conn.id(), error = %e, "could not send rejection");
    }
    let _ = conn.close().await;
}
