use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::GamePhase;

/// Game phase as exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// Roster and questions being entered.
    Setup,
    /// Rules slideshow.
    Briefing,
    /// Waiting for the round to start.
    Intro,
    /// Question on screen, buzzers open.
    QuestionDisplay,
    /// A team is answering.
    TeamAnswering,
    /// Outcome of the question on screen.
    Feedback,
    /// Finished-game summary.
    GameFinished,
    /// Final leaderboard.
    RoundOver,
}

impl From<GamePhase> for VisibleGamePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Setup => VisibleGamePhase::Setup,
            GamePhase::Briefing => VisibleGamePhase::Briefing,
            GamePhase::Intro => VisibleGamePhase::Intro,
            GamePhase::QuestionDisplay => VisibleGamePhase::QuestionDisplay,
            GamePhase::TeamAnswering => VisibleGamePhase::TeamAnswering,
            GamePhase::Feedback => VisibleGamePhase::Feedback,
            GamePhase::GameFinished => VisibleGamePhase::GameFinished,
            GamePhase::RoundOver => VisibleGamePhase::RoundOver,
        }
    }
}
