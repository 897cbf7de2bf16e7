use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{common::GameStateSnapshot, game::TeamSummary, phase::VisibleGamePhase};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Event with a raw text payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Credential sent as the first event of the admin stream.
pub struct AdminHandshake {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast after every accepted command and on question expiry.
pub struct PhaseChangedEvent(pub GameStateSnapshot);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast on every countdown decrement.
pub struct TimerEvent {
    pub phase: VisibleGamePhase,
    pub main_timer: u32,
    pub answer_timer: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a verdict or an undo changes a team's score.
pub struct ScoreChangedEvent {
    pub team: TeamSummary,
}
