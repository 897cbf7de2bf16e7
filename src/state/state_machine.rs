use thiserror::Error;

/// Phases of a Brain Blast session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Roster and questions are being entered.
    Setup,
    /// Rules slideshow shown before the round.
    Briefing,
    /// Round is ready, waiting for the operator to start it.
    Intro,
    /// A question is on screen with the main countdown running; buzzers are open.
    QuestionDisplay,
    /// A team buzzed in and has the answer countdown running.
    TeamAnswering,
    /// Outcome of the question is shown until the operator moves on.
    Feedback,
    /// Last question closed; finished-game summary is shown.
    GameFinished,
    /// Round ended; only the leaderboard remains.
    RoundOver,
}

/// Events that move the state machine between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Operator submitted the roster and question set.
    SetupSubmitted,
    /// Briefing slides exhausted or skipped.
    BriefingCompleted,
    /// Operator started the round.
    RoundStarted,
    /// Buzz arbitration granted a team the right to answer.
    BuzzAccepted,
    /// Operator judged the active team's answer.
    VerdictRecorded,
    /// Main countdown reached zero with nobody answering.
    MainTimerExpired,
    /// Operator burned the question on screen.
    QuestionSkipped,
    /// Operator reverted the last scoring action.
    ScoreUndone,
    /// Operator moved on to the next question.
    NextQuestion,
    /// Operator moved on after the last question.
    QuestionsExhausted,
    /// Escape control ending the round from anywhere.
    RoundAborted,
    /// Operator dismissed the finished-game summary.
    FinishDismissed,
}

/// Error returned when an event cannot be applied from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// A validated transition that has not been applied yet.
///
/// Planning is pure so callers can check their own preconditions and only then commit,
/// leaving the machine untouched when anything refuses the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a plan does nothing until applied"]
pub struct Plan {
    /// Phase the state machine is in.
    pub from: GamePhase,
    /// Phase the state machine will move to.
    pub to: GamePhase,
    /// Event that triggered this transition.
    pub event: GameEvent,
    /// Version number after applying this transition.
    pub version_next: u64,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase of the state machine.
    pub phase: GamePhase,
    /// Version number of the state machine (increments on each transition).
    pub version: u64,
}

/// Phase state machine of a Brain Blast session.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: u64,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::Setup,
            version: 0,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised in the setup phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
        }
    }

    /// Validate that `event` can be applied from the current phase.
    pub fn plan(&self, event: GameEvent) -> Result<Plan, InvalidTransition> {
        let to = self.compute_transition(event)?;
        Ok(Plan {
            from: self.phase,
            to,
            event,
            version_next: self.version + 1,
        })
    }

    /// Commit a plan produced by [`GameStateMachine::plan`] on this exact state.
    pub fn apply(&mut self, plan: Plan) -> GamePhase {
        debug_assert_eq!(plan.from, self.phase, "plan applied on a different phase");
        debug_assert_eq!(plan.version_next, self.version + 1, "plan applied twice");

        self.phase = plan.to;
        self.version = plan.version_next;
        self.phase
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (GamePhase::Setup | GamePhase::RoundOver, GameEvent::SetupSubmitted) => {
                GamePhase::Briefing
            }
            (GamePhase::Briefing, GameEvent::BriefingCompleted) => GamePhase::Intro,
            (GamePhase::Intro, GameEvent::RoundStarted) => GamePhase::QuestionDisplay,
            (
                GamePhase::QuestionDisplay | GamePhase::TeamAnswering,
                GameEvent::BuzzAccepted,
            ) => GamePhase::TeamAnswering,
            (GamePhase::TeamAnswering, GameEvent::VerdictRecorded) => GamePhase::Feedback,
            (GamePhase::QuestionDisplay, GameEvent::MainTimerExpired) => GamePhase::Feedback,
            (GamePhase::QuestionDisplay, GameEvent::QuestionSkipped) => GamePhase::Feedback,
            (GamePhase::Feedback, GameEvent::ScoreUndone) => GamePhase::QuestionDisplay,
            (GamePhase::Feedback, GameEvent::NextQuestion) => GamePhase::QuestionDisplay,
            (GamePhase::Feedback, GameEvent::QuestionsExhausted) => GamePhase::GameFinished,
            (GamePhase::GameFinished, GameEvent::FinishDismissed) => GamePhase::RoundOver,
            (_, GameEvent::RoundAborted) => GamePhase::RoundOver,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        let plan = sm.plan(event).unwrap();
        sm.apply(plan)
    }

    #[test]
    fn initial_state_is_setup() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Setup);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn full_happy_path_through_round() {
        let mut sm = GameStateMachine::new();

        assert_eq!(apply(&mut sm, GameEvent::SetupSubmitted), GamePhase::Briefing);
        assert_eq!(apply(&mut sm, GameEvent::BriefingCompleted), GamePhase::Intro);
        assert_eq!(
            apply(&mut sm, GameEvent::RoundStarted),
            GamePhase::QuestionDisplay
        );
        assert_eq!(
            apply(&mut sm, GameEvent::BuzzAccepted),
            GamePhase::TeamAnswering
        );
        assert_eq!(
            apply(&mut sm, GameEvent::BuzzAccepted),
            GamePhase::TeamAnswering
        );
        assert_eq!(apply(&mut sm, GameEvent::VerdictRecorded), GamePhase::Feedback);
        assert_eq!(
            apply(&mut sm, GameEvent::NextQuestion),
            GamePhase::QuestionDisplay
        );
        assert_eq!(apply(&mut sm, GameEvent::QuestionSkipped), GamePhase::Feedback);
        assert_eq!(
            apply(&mut sm, GameEvent::QuestionsExhausted),
            GamePhase::GameFinished
        );
        assert_eq!(apply(&mut sm, GameEvent::FinishDismissed), GamePhase::RoundOver);
        assert_eq!(sm.version(), 10);
    }

    #[test]
    fn timer_expiry_only_closes_an_open_question() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::SetupSubmitted);
        apply(&mut sm, GameEvent::BriefingCompleted);
        apply(&mut sm, GameEvent::RoundStarted);
        apply(&mut sm, GameEvent::BuzzAccepted);

        let err = sm.plan(GameEvent::MainTimerExpired).unwrap_err();
        assert_eq!(err.from, GamePhase::TeamAnswering);
        assert_eq!(err.event, GameEvent::MainTimerExpired);
    }

    #[test]
    fn undo_returns_feedback_to_question_display() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::SetupSubmitted);
        apply(&mut sm, GameEvent::BriefingCompleted);
        apply(&mut sm, GameEvent::RoundStarted);
        apply(&mut sm, GameEvent::BuzzAccepted);
        apply(&mut sm, GameEvent::VerdictRecorded);

        assert_eq!(
            apply(&mut sm, GameEvent::ScoreUndone),
            GamePhase::QuestionDisplay
        );
        assert!(sm.plan(GameEvent::ScoreUndone).is_err());
    }

    #[test]
    fn abort_is_accepted_from_every_phase() {
        let phases = [
            GamePhase::Setup,
            GamePhase::Briefing,
            GamePhase::Intro,
            GamePhase::QuestionDisplay,
            GamePhase::TeamAnswering,
            GamePhase::Feedback,
            GamePhase::GameFinished,
            GamePhase::RoundOver,
        ];

        for phase in phases {
            let sm = GameStateMachine { phase, version: 3 };
            let plan = sm.plan(GameEvent::RoundAborted).unwrap();
            assert_eq!(plan.to, GamePhase::RoundOver);
            assert_eq!(plan.version_next, 4);
        }
    }

    #[test]
    fn new_setup_is_accepted_after_round_over() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::RoundAborted);
        assert_eq!(apply(&mut sm, GameEvent::SetupSubmitted), GamePhase::Briefing);
    }

    #[test]
    fn invalid_transition_leaves_state_untouched() {
        let sm = GameStateMachine::new();
        let err = sm.plan(GameEvent::VerdictRecorded).unwrap_err();
        assert_eq!(err.from, GamePhase::Setup);
        assert_eq!(sm.snapshot(), Snapshot {
            phase: GamePhase::Setup,
            version: 0
        });
    }
}
