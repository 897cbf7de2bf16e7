use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        common::GameStateSnapshot,
        game::TeamSummary,
        sse::{PhaseChangedEvent, ScoreChangedEvent, ServerEvent, TimerEvent},
    },
    state::{AppState, engine::GameEngine},
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_TIMER: &str = "timer";
const EVENT_SCORE_CHANGED: &str = "score_changed";

/// Broadcast the full game snapshot after a state change.
pub fn broadcast_phase_changed(state: &AppState, engine: &GameEngine) {
    let payload = PhaseChangedEvent(GameStateSnapshot::from_engine(engine));
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
    send_admin_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast both countdown values.
pub fn broadcast_timer(state: &AppState, engine: &GameEngine) {
    let payload = TimerEvent {
        phase: engine.phase().into(),
        main_timer: engine.main_timer(),
        answer_timer: engine.answer_timer(),
    };
    send_public_event(state, EVENT_TIMER, &payload);
}

/// Broadcast the new scores of a team.
pub fn broadcast_score_changed(state: &AppState, engine: &GameEngine, team_id: &str) {
    let Some(team) = engine.team(team_id) else {
        warn!(team_id, "score changed for a team missing from the roster");
        return;
    };
    let payload = ScoreChangedEvent {
        team: TeamSummary::from(team),
    };
    send_public_event(state, EVENT_SCORE_CHANGED, &payload);
    send_admin_event(state, EVENT_SCORE_CHANGED, &payload);
}

fn send_public_event(state: &AppState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_admin_event(state: &AppState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.admin_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize admin SSE payload"),
    }
}
