use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::phase::VisibleGamePhase;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the server answers.
    pub status: String,
    /// Phase of the live game.
    pub phase: VisibleGamePhase,
}

impl HealthResponse {
    /// Operational response for the given phase.
    pub fn ok(phase: VisibleGamePhase) -> Self {
        Self {
            status: "ok".to_string(),
            phase,
        }
    }
}
