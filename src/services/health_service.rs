use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness together with the phase of the live game.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let phase = state.read_engine(|engine| engine.phase()).await;
    HealthResponse::ok(phase.into())
}
