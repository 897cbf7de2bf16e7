use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::{
        common::GameStateSnapshot,
        sse::{AdminHandshake, PhaseChangedEvent, ServerEvent},
    },
    error::ServiceError,
    state::SharedState,
};

/// Subscribe to the shared public SSE stream.
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Admin stream ready to be handed to [`to_sse_stream`].
pub struct AdminSubscription {
    /// Receiver subscribed before the snapshot was taken.
    pub receiver: broadcast::Receiver<ServerEvent>,
    /// Handshake followed by the current snapshot.
    pub initial: Vec<ServerEvent>,
}

/// Subscribe to the admin-only SSE stream, claiming the admin token.
///
/// The token is claimed by the last await, so a client dropping earlier leaves it free.
pub async fn subscribe_admin(state: &SharedState) -> Result<AdminSubscription, ServiceError> {
    let receiver = state.admin_sse().subscribe();
    let snapshot = current_snapshot_event(state).await;
    let token = state
        .admin_channel()
        .claim_token()
        .await
        .ok_or_else(|| {
            ServiceError::Unauthorized("Another admin SSE stream is already active".into())
        })?;
    let initial = admin_handshake(&token).into_iter().chain(snapshot).collect();
    Ok(AdminSubscription {
        receiver,
        initial,
    })
}

/// Identifies the target SSE stream so teardown can do stream-specific bookkeeping.
#[derive(Clone)]
pub enum StreamKind {
    Public,
    /// Holds the shared state so the admin token can be released once the client is gone.
    Admin(SharedState),
}

/// Convert a broadcast receiver into an SSE response, starting with `initial` events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    initial: Vec<ServerEvent>,
    kind: StreamKind,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(16);

    tokio::spawn(async move {
        for payload in initial {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                break;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Timer events are superseded by the next one anyway.
                            debug!(skipped, "SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        match kind {
            StreamKind::Public => info!("Public SSE stream disconnected"),
            StreamKind::Admin(state) => {
                state.admin_channel().release_token().await;
                info!("Admin SSE stream disconnected")
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}

/// Event carrying the admin token, sent first on the admin stream.
pub fn admin_handshake(token: &str) -> Option<ServerEvent> {
    ServerEvent::json(
        Some("admin_token".to_string()),
        &AdminHandshake {
            token: token.to_string(),
        },
    )
    .ok()
}

/// Current snapshot as a `phase_changed` event so new subscribers render immediately.
pub async fn current_snapshot_event(state: &SharedState) -> Option<ServerEvent> {
    let snapshot = state.read_engine(GameStateSnapshot::from_engine).await;
    ServerEvent::json(
        Some("phase_changed".to_string()),
        &PhaseChangedEvent(snapshot),
    )
    .ok()
}
