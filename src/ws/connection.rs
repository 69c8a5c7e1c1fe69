//! Per-connection pumps.
//!
//! An admitted connection runs two independently scheduled tasks:
//!
//! - [`write_pump`] drains the connection's bounded outbound queue into the
//!   socket. When the hub closes the queue it sends a Close frame; when a
//!   write fails it stops at once.
//! - [`read_pump`] watches the socket for the peer going away. Clients are
//!   receive-only, so data frames are discarded. On exit it unregisters
//!   the connection from the hub.
//!
//! The write pump holds a [`oneshot::Sender`] that is dropped when it
//! exits; the read pump treats that as a reason to stop too. Teardown is
//! therefore reached from either side: a peer close unregisters, which
//! closes the queue and stops the writer; a write failure stops the
//! writer, which stops the reader, which unregisters.

use std::fmt::Display;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::auth::Identity;
use crate::domain::{ConnectionId, Event, Hub};

/// Admits `socket` into the hub and runs both pumps until they have
/// exited.
pub async fn serve_connection(socket: WebSocket, hub: Hub, identity: Identity) {
    let (conn_id, queue) = hub.admit(Some(identity.user_id));
    tracing::info!(
        %conn_id,
        user_id = %identity.user_id,
        queue_capacity = hub.queue_capacity(),
        "ws connection admitted"
    );

    let (sink, stream) = socket.split();
    let (writer_done, writer_exited) = oneshot::channel();

    let writer = tokio::spawn(write_pump(sink, queue, conn_id, writer_done));
    let reader = tokio::spawn(read_pump(stream, hub, conn_id, writer_exited));

    let (read_result, write_result) = tokio::join!(reader, writer);
    for (pump, result) in [("read", read_result), ("write", write_result)] {
        if let Err(e) = result {
            tracing::error!(%conn_id, pump, error = %e, "ws pump task failed");
        }
    }
    tracing::info!(%conn_id, "ws connection closed");
}

/// Writes queued events to `sink` until the queue closes or a write fails.
///
/// Each event is sent as one text frame, verbatim. `done` is dropped on
/// return to signal the paired [`read_pump`].
pub async fn write_pump<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<Event>,
    conn_id: ConnectionId,
    done: oneshot::Sender<()>,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    loop {
        let Some(event) = queue.recv().await else {
            tracing::debug!(%conn_id, "outbound queue closed, sending close frame");
            if let Err(e) = sink.send(Message::Close(None)).await {
                tracing::debug!(%conn_id, error = %e, "close frame not delivered");
            }
            break;
        };

        if let Err(e) = sink.send(Message::text(event.as_str().to_owned())).await {
            tracing::warn!(%conn_id, error = %e, "ws write failed");
            break;
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!(%conn_id, error = %e, "ws sink close failed");
    }
    drop(done);
}

/// Reads frames from `stream` until the peer closes, the transport
/// errors, or the paired [`write_pump`] exits; then unregisters the
/// connection.
pub async fn read_pump<R, E>(
    mut stream: R,
    hub: Hub,
    conn_id: ConnectionId,
    mut writer_exited: oneshot::Receiver<()>,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(%conn_id, "peer closed connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(%conn_id, error = %e, "ws read failed");
                    break;
                }
            },
            _ = &mut writer_exited => {
                tracing::debug!(%conn_id, "write pump exited");
                break;
            }
        }
    }

    hub.unregister(conn_id);
}
