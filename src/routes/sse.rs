use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    error::AppError,
    services::sse_service::{self, StreamKind},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Public SSE stream: phase_changed, timer and score_changed events", content_type = "text/event-stream", body = String))
)]
/// Stream realtime game events to displays.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!("New public SSE connection");
    let initial = sse_service::current_snapshot_event(&state)
        .await
        .into_iter()
        .collect();
    sse_service::to_sse_stream(receiver, initial, StreamKind::Public)
}

#[utoipa::path(
    get,
    path = "/sse/admin",
    tag = "sse",
    responses(
        (status = 200, description = "Admin SSE stream, first event carries the admin token", content_type = "text/event-stream", body = String),
        (status = 401, description = "Another admin stream is already connected")
    )
)]
/// Stream admin events, issuing the admin token required by `/admin` routes.
pub async fn admin_stream(
    State(state): State<SharedState>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let subscription = sse_service::subscribe_admin(&state).await?;
    info!("New admin SSE connection");
    Ok(sse_service::to_sse_stream(
        subscription.receiver,
        subscription.initial,
        StreamKind::Admin(state),
    ))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/admin", get(admin_stream))
}
