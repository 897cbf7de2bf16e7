use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        format_system_time,
        game::{QuestionSummary, TeamSummary},
        phase::VisibleGamePhase,
    },
    state::{
        engine::GameEngine,
        game::{AnswerOutcome, LastOutcome},
        state_machine::GamePhase,
    },
};

/// Outcome tag of the last closed question.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Correct,
    Wrong,
    Timeout,
}

impl From<AnswerOutcome> for OutcomeTag {
    fn from(value: AnswerOutcome) -> Self {
        match value {
            AnswerOutcome::Correct => OutcomeTag::Correct,
            AnswerOutcome::Wrong => OutcomeTag::Wrong,
            AnswerOutcome::Timeout => OutcomeTag::Timeout,
        }
    }
}

/// How the last question closed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LastOutcomeSnapshot {
    pub outcome: OutcomeTag,
    /// Absent when the question burned without an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub delta: i32,
}

impl From<&LastOutcome> for LastOutcomeSnapshot {
    fn from(value: &LastOutcome) -> Self {
        Self {
            outcome: value.outcome.into(),
            team_id: value.team_id.clone(),
            delta: value.delta,
        }
    }
}

/// Everything a display needs to render the current game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStateSnapshot {
    pub session_id: Uuid,
    /// RFC 3339 timestamp of the setup that opened the session.
    pub started_at: String,
    pub phase: VisibleGamePhase,
    /// Incremented on every phase transition.
    pub version: u64,
    /// 0-based position in the question sequence.
    pub question_index: usize,
    pub question_count: usize,
    /// Present while a question is open or its feedback is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSummary>,
    /// True when a reserve question replaces the scheduled one.
    pub substituted: bool,
    pub backups_remaining: usize,
    pub main_timer: u32,
    pub answer_timer: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<LastOutcomeSnapshot>,
    pub can_undo: bool,
    pub briefing_slide: usize,
    pub briefing_slide_count: usize,
    /// Teams sorted by total score, highest first.
    pub teams: Vec<TeamSummary>,
}

impl GameStateSnapshot {
    /// Project the engine for clients.
    pub fn from_engine(engine: &GameEngine) -> Self {
        let phase = engine.phase();
        let question = match phase {
            GamePhase::QuestionDisplay | GamePhase::TeamAnswering | GamePhase::Feedback => {
                engine.current_question().map(QuestionSummary::from)
            }
            _ => None,
        };

        Self {
            session_id: engine.session_id(),
            started_at: format_system_time(engine.started_at()),
            phase: phase.into(),
            version: engine.snapshot().version,
            question_index: engine.question_index(),
            question_count: engine.question_count(),
            question,
            substituted: engine.is_substituted(),
            backups_remaining: engine.backups_remaining(),
            main_timer: engine.main_timer(),
            answer_timer: engine.answer_timer(),
            active_team_id: engine.active_team().map(str::to_owned),
            last_outcome: engine.last_outcome().map(LastOutcomeSnapshot::from),
            can_undo: engine.can_undo(),
            briefing_slide: engine.briefing_slide(),
            briefing_slide_count: engine.briefing_slide_count(),
            teams: engine
                .leaderboard()
                .into_iter()
                .map(TeamSummary::from)
                .collect(),
        }
    }
}
