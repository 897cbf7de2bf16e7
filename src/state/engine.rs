//! The game engine: the single owner of a live session. Operator commands go through
//! [`GameEngine::dispatch`], countdown ticks through [`GameEngine::tick`]; both run one at a
//! time behind the shared runtime lock.

use std::time::SystemTime;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    state::{
        buzz::{self, BuzzDecision},
        game::{AnswerOutcome, LastOutcome, Question, Team, Verdict},
        questions::QuestionDeck,
        scoring::{Roster, TeamSeed},
        state_machine::{GameEvent, GamePhase, GameStateMachine, InvalidTransition, Snapshot},
        timers::{Countdown, CountdownTick, TimerKind, TimerTicket},
    },
};

/// Roster and questions submitted by the operator to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    /// Teams in roster order.
    pub teams: Vec<TeamSeed>,
    /// Questions for the round, already shuffled if requested.
    pub deck: QuestionDeck,
}

/// Everything the operator console can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Replace roster and questions and open the briefing.
    SubmitSetup(SessionSetup),
    /// Next briefing slide; completes the briefing on the last one.
    NextSlide,
    /// Previous briefing slide.
    PreviousSlide,
    /// Skip the rest of the briefing.
    CompleteBriefing,
    /// Open the first question.
    StartRound,
    /// A team signals it wants to answer.
    Buzz {
        /// Team that pressed its buzzer.
        team_id: String,
    },
    /// Judge the active team's answer.
    Verdict(Verdict),
    /// Burn the question on screen without scoring.
    Skip,
    /// Revert the last verdict.
    Undo,
    /// Move past the feedback screen.
    NextQuestion,
    /// End the round from any phase.
    AbortRound,
    /// Close the finished-game summary.
    DismissFinish,
}

impl OperatorCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            OperatorCommand::SubmitSetup(_) => "setup",
            OperatorCommand::NextSlide => "next_slide",
            OperatorCommand::PreviousSlide => "previous_slide",
            OperatorCommand::CompleteBriefing => "complete_briefing",
            OperatorCommand::StartRound => "start_round",
            OperatorCommand::Buzz { .. } => "buzz",
            OperatorCommand::Verdict(_) => "verdict",
            OperatorCommand::Skip => "skip",
            OperatorCommand::Undo => "undo",
            OperatorCommand::NextQuestion => "next_question",
            OperatorCommand::AbortRound => "abort",
            OperatorCommand::DismissFinish => "dismiss_finish",
        }
    }
}

/// Why a command or tick left the engine untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The phase table refuses the event.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// Buzzers only open while a question is on screen.
    #[error("buzzers are closed during {0:?}")]
    BuzzClosed(GamePhase),
    /// Team id not on the roster.
    #[error("unknown team `{0}`")]
    UnknownTeam(String),
    /// Same team buzzed again while answering.
    #[error("team `{0}` is already answering")]
    AlreadyAnswering(String),
    /// Verdict without a team answering.
    #[error("no team is answering")]
    NoActiveTeam,
    /// Undo without a retained score change.
    #[error("no score change to undo")]
    NothingToUndo,
    /// Setup would leave the round without any question.
    #[error("question deck is empty")]
    EmptyDeck,
    /// Command tied to a phase that is not current.
    #[error("command requires {expected:?} but the game is in {actual:?}")]
    WrongPhase {
        /// Phase the command belongs to.
        expected: GamePhase,
        /// Phase the game is in.
        actual: GamePhase,
    },
    /// Previous slide requested on the first one.
    #[error("already on the first briefing slide")]
    FirstSlide,
}

/// Summary of a command the engine accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Phase before the command.
    pub from: GamePhase,
    /// Phase after the command.
    pub phase: GamePhase,
    /// State machine version after the command.
    pub version: u64,
    /// Team whose score changed, if any.
    pub scored_team: Option<String>,
}

impl Applied {
    /// Whether the command moved the state machine.
    pub fn transitioned(&self) -> bool {
        self.from != self.phase
    }
}

/// Result of feeding one countdown tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The ticket no longer matches the countdown the engine wants; nothing changed.
    Stale,
    /// A clock went down by one second.
    Counted {
        /// Clock that ticked.
        kind: TimerKind,
        /// Seconds left on it.
        remaining: u32,
    },
    /// The main clock ran out and the question burned.
    Expired,
    /// Clock already at zero.
    Holding,
}

/// Team whose score a command changed.
type Scored = Option<String>;

#[derive(Debug, Clone, Copy)]
struct Session {
    id: Uuid,
    started_at: SystemTime,
}

impl Session {
    fn open() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: SystemTime::now(),
        }
    }
}

/// In-memory aggregate of one live session.
#[derive(Debug, Clone)]
pub struct GameEngine {
    machine: GameStateMachine,
    session: Session,
    roster: Roster,
    deck: QuestionDeck,
    question_index: usize,
    active_team: Option<String>,
    main_timer: Countdown,
    answer_timer: Countdown,
    last_outcome: Option<LastOutcome>,
    briefing_slide: usize,
    briefing_slides: usize,
}

impl GameEngine {
    /// Engine in setup, with no team and the generated deck.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            machine: GameStateMachine::new(),
            session: Session::open(),
            roster: Roster::default(),
            deck: QuestionDeck::generate(config.deck()),
            question_index: 0,
            active_team: None,
            main_timer: Countdown::new(config.question_duration_secs()),
            answer_timer: Countdown::new(config.answer_duration_secs()),
            last_outcome: None,
            briefing_slide: 0,
            briefing_slides: config.briefing_slide_count().max(1),
        }
    }

    /// Apply one operator command. A rejected command leaves the engine untouched.
    pub fn dispatch(&mut self, command: OperatorCommand) -> Result<Applied, Rejection> {
        let from = self.machine.phase();
        let scored_team = match command {
            OperatorCommand::SubmitSetup(setup) => self.submit_setup(setup)?,
            OperatorCommand::NextSlide => self.next_slide()?,
            OperatorCommand::PreviousSlide => self.previous_slide()?,
            OperatorCommand::CompleteBriefing => self.transition(GameEvent::BriefingCompleted)?,
            OperatorCommand::StartRound => self.start_round()?,
            OperatorCommand::Buzz { team_id } => self.buzz(team_id)?,
            OperatorCommand::Verdict(verdict) => self.verdict(verdict)?,
            OperatorCommand::Skip => self.burn_question(GameEvent::QuestionSkipped)?,
            OperatorCommand::Undo => self.undo()?,
            OperatorCommand::NextQuestion => self.next_question()?,
            OperatorCommand::AbortRound => self.abort()?,
            OperatorCommand::DismissFinish => self.transition(GameEvent::FinishDismissed)?,
        };

        Ok(Applied {
            from,
            phase: self.machine.phase(),
            version: self.machine.version(),
            scored_team,
        })
    }

    /// Countdown the engine currently wants running, if any.
    ///
    /// The answer clock stops wanting ticks once it holds at zero.
    pub fn active_timer(&self) -> Option<TimerTicket> {
        let snapshot = self.machine.snapshot();
        let kind = TimerKind::for_phase(snapshot.phase)?;
        if kind == TimerKind::Answer && self.answer_timer.is_elapsed() {
            return None;
        }
        Some(TimerTicket {
            kind,
            phase: snapshot.phase,
            version: snapshot.version,
        })
    }

    /// Feed one elapsed second to the countdown identified by `ticket`.
    pub fn tick(&mut self, ticket: TimerTicket) -> TickOutcome {
        if self.active_timer() != Some(ticket) {
            return TickOutcome::Stale;
        }

        match ticket.kind {
            TimerKind::Main => match self.main_timer.tick() {
                CountdownTick::Running(remaining) => TickOutcome::Counted {
                    kind: TimerKind::Main,
                    remaining,
                },
                CountdownTick::ReachedZero => self
                    .burn_question(GameEvent::MainTimerExpired)
                    .map_or(TickOutcome::Holding, |_| TickOutcome::Expired),
                CountdownTick::Holding => TickOutcome::Holding,
            },
            // Holds at zero and waits for the operator's verdict.
            TimerKind::Answer => match self.answer_timer.tick() {
                CountdownTick::Running(remaining) => TickOutcome::Counted {
                    kind: TimerKind::Answer,
                    remaining,
                },
                CountdownTick::ReachedZero => TickOutcome::Counted {
                    kind: TimerKind::Answer,
                    remaining: 0,
                },
                CountdownTick::Holding => TickOutcome::Holding,
            },
        }
    }

    fn submit_setup(&mut self, setup: SessionSetup) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(GameEvent::SetupSubmitted)?;
        if setup.deck.is_empty() {
            return Err(Rejection::EmptyDeck);
        }

        self.session = Session::open();
        self.roster = Roster::from_seeds(setup.teams);
        self.deck = setup.deck;
        self.briefing_slide = 0;
        self.reset_question_state();
        self.question_index = 0;
        self.machine.apply(plan);
        Ok(None)
    }

    fn next_slide(&mut self) -> Result<Scored, Rejection> {
        self.expect_phase(GamePhase::Briefing)?;
        if self.briefing_slide + 1 >= self.briefing_slides {
            return self.transition(GameEvent::BriefingCompleted);
        }
        self.briefing_slide += 1;
        Ok(None)
    }

    fn previous_slide(&mut self) -> Result<Scored, Rejection> {
        self.expect_phase(GamePhase::Briefing)?;
        if self.briefing_slide == 0 {
            return Err(Rejection::FirstSlide);
        }
        self.briefing_slide -= 1;
        Ok(None)
    }

    fn start_round(&mut self) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(GameEvent::RoundStarted)?;
        self.question_index = 0;
        self.reset_question_state();
        self.machine.apply(plan);
        Ok(None)
    }

    fn buzz(&mut self, team_id: String) -> Result<Scored, Rejection> {
        let phase = self.machine.phase();
        let decision = buzz::arbitrate(phase, self.active_team.as_deref(), &team_id)
            .ok_or(Rejection::BuzzClosed(phase))?;
        if !self.roster.contains(&team_id) {
            return Err(Rejection::UnknownTeam(team_id));
        }
        if !decision.grants_turn() {
            return Err(Rejection::AlreadyAnswering(team_id));
        }

        let plan = self.machine.plan(GameEvent::BuzzAccepted)?;
        if let BuzzDecision::Replaced { previous } = &decision {
            info!(previous = %previous, team_id = %team_id, "answering team replaced");
        }
        self.answer_timer.reset();
        self.active_team = Some(team_id);
        self.machine.apply(plan);
        Ok(None)
    }

    fn verdict(&mut self, verdict: Verdict) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(GameEvent::VerdictRecorded)?;
        let team_id = self.active_team.clone().ok_or(Rejection::NoActiveTeam)?;
        let delta = self
            .current_question()
            .ok_or(Rejection::EmptyDeck)?
            .delta_for(verdict);
        if self.roster.apply_delta(&team_id, delta).is_none() {
            return Err(Rejection::UnknownTeam(team_id));
        }

        self.last_outcome = Some(LastOutcome {
            outcome: verdict.outcome(),
            team_id: Some(team_id.clone()),
            delta,
        });
        self.active_team = None;
        self.machine.apply(plan);
        Ok(Some(team_id))
    }

    /// Close the open question with a timeout outcome and no score change.
    fn burn_question(&mut self, event: GameEvent) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(event)?;
        self.last_outcome = Some(LastOutcome {
            outcome: AnswerOutcome::Timeout,
            team_id: None,
            delta: 0,
        });
        self.active_team = None;
        self.machine.apply(plan);
        Ok(None)
    }

    fn undo(&mut self) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(GameEvent::ScoreUndone)?;
        let record = self.roster.undo_last().ok_or(Rejection::NothingToUndo)?;

        self.last_outcome = None;
        self.active_team = None;
        self.main_timer.reset();
        self.answer_timer.reset();
        // Falls back to the primary question once the reserve pool is exhausted.
        self.deck.substitute_next_backup();
        self.machine.apply(plan);
        Ok(Some(record.team_id))
    }

    fn next_question(&mut self) -> Result<Scored, Rejection> {
        let has_next = self.question_index + 1 < self.deck.len();
        let event = if has_next {
            GameEvent::NextQuestion
        } else {
            GameEvent::QuestionsExhausted
        };
        let plan = self.machine.plan(event)?;

        if has_next {
            self.question_index += 1;
            self.reset_question_state();
        } else {
            self.roster.clear_last_change();
        }
        self.machine.apply(plan);
        Ok(None)
    }

    fn abort(&mut self) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(GameEvent::RoundAborted)?;
        self.active_team = None;
        self.roster.clear_last_change();
        self.machine.apply(plan);
        Ok(None)
    }

    fn transition(&mut self, event: GameEvent) -> Result<Scored, Rejection> {
        let plan = self.machine.plan(event)?;
        self.machine.apply(plan);
        Ok(None)
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), Rejection> {
        let actual = self.machine.phase();
        if actual == expected {
            Ok(())
        } else {
            Err(Rejection::WrongPhase { expected, actual })
        }
    }

    /// Fresh question: full clocks, nobody answering, nothing to undo, primary question shown.
    fn reset_question_state(&mut self) {
        self.active_team = None;
        self.main_timer.reset();
        self.answer_timer.reset();
        self.last_outcome = None;
        self.roster.clear_last_change();
        self.deck.clear_substitution();
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// Phase and version of the state machine.
    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// Identifier of the current session, renewed on every setup.
    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    /// When the current session was opened.
    pub fn started_at(&self) -> SystemTime {
        self.session.started_at
    }

    /// Teams in roster order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.roster.iter()
    }

    /// Look a team up by identifier.
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.roster.get(team_id)
    }

    /// Teams sorted by total score, highest first.
    pub fn leaderboard(&self) -> Vec<&Team> {
        self.roster.leaderboard()
    }

    /// Question on screen, the reserve substitute when one is in place.
    pub fn current_question(&self) -> Option<&Question> {
        self.deck.current(self.question_index)
    }

    /// Whether a reserve question replaces the primary one.
    pub fn is_substituted(&self) -> bool {
        self.deck.is_substituted()
    }

    /// Unused reserve questions.
    pub fn backups_remaining(&self) -> usize {
        self.deck.backups_remaining()
    }

    /// 0-based position in the primary sequence.
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Number of primary questions in the round.
    pub fn question_count(&self) -> usize {
        self.deck.len()
    }

    /// Team currently answering.
    pub fn active_team(&self) -> Option<&str> {
        self.active_team.as_deref()
    }

    /// Seconds left on the question clock.
    pub fn main_timer(&self) -> u32 {
        self.main_timer.remaining()
    }

    /// Seconds left on the answer clock.
    pub fn answer_timer(&self) -> u32 {
        self.answer_timer.remaining()
    }

    /// How the last question closed.
    pub fn last_outcome(&self) -> Option<&LastOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether an undo would currently be accepted.
    pub fn can_undo(&self) -> bool {
        self.machine.phase() == GamePhase::Feedback && self.roster.last_change().is_some()
    }

    /// 0-based briefing slide.
    pub fn briefing_slide(&self) -> usize {
        self.briefing_slide
    }

    /// Slides in the briefing deck.
    pub fn briefing_slide_count(&self) -> usize {
        self.briefing_slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Difficulty;

    fn question(id: u32, points: u32) -> Question {
        Question {
            id,
            difficulty: Difficulty::from_points(points),
            points,
            image_url: format!("/q/{id}.png"),
        }
    }

    fn seeds(scores: &[i32]) -> Vec<TeamSeed> {
        scores
            .iter()
            .enumerate()
            .map(|(n, score)| TeamSeed {
                name: format!("Team {}", n + 1),
                initial_score: *score,
            })
            .collect()
    }

    fn engine_with(deck: QuestionDeck, scores: &[i32]) -> GameEngine {
        let config = AppConfig::default();
        let mut engine = GameEngine::new(&config);
        engine
            .dispatch(OperatorCommand::SubmitSetup(SessionSetup {
                teams: seeds(scores),
                deck,
            }))
            .unwrap();
        engine
    }

    /// Engine on the first question of a default deck with three teams.
    fn playing() -> GameEngine {
        let mut engine = engine_with(QuestionDeck::generate(&Default::default()), &[0, 0, 0]);
        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();
        engine
    }

    fn buzz(engine: &mut GameEngine, team_id: &str) -> Result<Applied, Rejection> {
        engine.dispatch(OperatorCommand::Buzz {
            team_id: team_id.into(),
        })
    }

    fn tick_active(engine: &mut GameEngine) -> TickOutcome {
        let ticket = engine.active_timer().expect("a countdown should be running");
        engine.tick(ticket)
    }

    fn assert_invariants(engine: &GameEngine) {
        for team in engine.teams() {
            assert_eq!(team.total_score, team.initial_score + team.round_score);
        }
        if engine.active_team().is_some() {
            assert_eq!(engine.phase(), GamePhase::TeamAnswering);
        }
    }

    #[test]
    fn setup_opens_briefing_with_fresh_scores() {
        let engine = engine_with(QuestionDeck::generate(&Default::default()), &[0, 20]);

        assert_eq!(engine.phase(), GamePhase::Briefing);
        assert_eq!(engine.team("team-1").map(|t| t.total_score), Some(20));
        assert_eq!(engine.team("team-1").map(|t| t.round_score), Some(0));
        assert_eq!(engine.question_count(), 15);
        assert!(engine.active_timer().is_none());
    }

    #[test]
    fn setup_with_empty_deck_is_rejected() {
        let mut engine = GameEngine::new(&AppConfig::default());
        let err = engine
            .dispatch(OperatorCommand::SubmitSetup(SessionSetup {
                teams: seeds(&[0]),
                deck: QuestionDeck::new(Vec::new(), Vec::new()),
            }))
            .unwrap_err();

        assert_eq!(err, Rejection::EmptyDeck);
        assert_eq!(engine.phase(), GamePhase::Setup);
    }

    #[test]
    fn briefing_slides_move_and_complete_on_last() {
        let mut engine = engine_with(QuestionDeck::generate(&Default::default()), &[0]);
        assert_eq!(
            engine.dispatch(OperatorCommand::PreviousSlide).unwrap_err(),
            Rejection::FirstSlide
        );

        for expected in 1..engine.briefing_slide_count() {
            engine.dispatch(OperatorCommand::NextSlide).unwrap();
            assert_eq!(engine.briefing_slide(), expected);
        }
        engine.dispatch(OperatorCommand::PreviousSlide).unwrap();
        engine.dispatch(OperatorCommand::NextSlide).unwrap();

        let applied = engine.dispatch(OperatorCommand::NextSlide).unwrap();
        assert_eq!(applied.phase, GamePhase::Intro);
        assert!(applied.transitioned());
    }

    #[test]
    fn start_round_opens_first_question_with_full_clock() {
        let engine = playing();

        assert_eq!(engine.phase(), GamePhase::QuestionDisplay);
        assert_eq!(engine.question_index(), 0);
        assert_eq!(engine.main_timer(), 180);
        assert_eq!(engine.current_question().map(|q| q.id), Some(1));
        assert_eq!(engine.active_timer().map(|t| t.kind), Some(TimerKind::Main));
    }

    // Correct verdict then advance.
    #[test]
    fn correct_verdict_scores_and_advances() {
        let mut engine = engine_with(
            QuestionDeck::new(vec![question(1, 5), question(2, 5)], Vec::new()),
            &[0, 0],
        );
        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();

        buzz(&mut engine, "team-1").unwrap();
        assert_eq!(engine.active_team(), Some("team-1"));
        assert_eq!(engine.answer_timer(), 5);

        let applied = engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();
        assert_eq!(applied.phase, GamePhase::Feedback);
        assert_eq!(applied.scored_team.as_deref(), Some("team-1"));
        assert_eq!(engine.team("team-1").map(|t| t.round_score), Some(5));
        assert_eq!(engine.team("team-1").map(|t| t.total_score), Some(5));
        assert_eq!(
            engine.last_outcome().map(|o| o.outcome),
            Some(AnswerOutcome::Correct)
        );
        assert!(engine.active_team().is_none());

        engine.dispatch(OperatorCommand::NextQuestion).unwrap();
        assert_eq!(engine.phase(), GamePhase::QuestionDisplay);
        assert_eq!(engine.question_index(), 1);
        assert_eq!(engine.main_timer(), 180);
        assert_eq!(engine.answer_timer(), 5);
        assert!(engine.last_outcome().is_none());
        assert_invariants(&engine);
    }

    // Undo after a wrong verdict, with a reserve question substituted.
    #[test]
    fn undo_restores_scores_and_substitutes_backup() {
        let mut engine = engine_with(
            QuestionDeck::new(
                vec![question(1, 5), question(2, 5), question(3, 10), question(4, 5)],
                vec![question(101, 5), question(102, 5)],
            ),
            &[0, 0, 20],
        );
        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();
        for _ in 0..3 {
            engine.dispatch(OperatorCommand::Skip).unwrap();
            engine.dispatch(OperatorCommand::NextQuestion).unwrap();
        }
        assert_eq!(engine.question_index(), 3);

        buzz(&mut engine, "team-2").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Wrong))
            .unwrap();
        assert_eq!(engine.team("team-2").map(|t| t.total_score), Some(15));
        assert!(engine.can_undo());

        let applied = engine.dispatch(OperatorCommand::Undo).unwrap();
        assert_eq!(applied.phase, GamePhase::QuestionDisplay);
        assert_eq!(engine.team("team-2").map(|t| t.round_score), Some(0));
        assert_eq!(engine.team("team-2").map(|t| t.total_score), Some(20));
        assert_eq!(engine.question_index(), 3);
        assert_eq!(engine.current_question().map(|q| q.id), Some(101));
        assert!(engine.last_outcome().is_none());
        assert!(engine.active_team().is_none());
        assert_eq!(engine.main_timer(), 180);
        assert_invariants(&engine);
    }

    #[test]
    fn verdict_uses_the_substituted_question_points() {
        let mut engine = engine_with(
            QuestionDeck::new(vec![question(1, 10)], vec![question(101, 5)]),
            &[0],
        );
        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();
        buzz(&mut engine, "team-0").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();
        engine.dispatch(OperatorCommand::Undo).unwrap();

        buzz(&mut engine, "team-0").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();
        assert_eq!(engine.team("team-0").map(|t| t.total_score), Some(5));

        // Reserve pool exhausted: the primary question comes back.
        engine.dispatch(OperatorCommand::Undo).unwrap();
        assert!(!engine.is_substituted());
        assert_eq!(engine.current_question().map(|q| q.id), Some(1));
        assert_eq!(engine.team("team-0").map(|t| t.total_score), Some(0));
    }

    #[test]
    fn undo_is_single_step() {
        let mut engine = playing();
        buzz(&mut engine, "team-0").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();
        engine.dispatch(OperatorCommand::Undo).unwrap();

        assert_eq!(
            engine.dispatch(OperatorCommand::Undo).unwrap_err(),
            Rejection::InvalidTransition(InvalidTransition {
                from: GamePhase::QuestionDisplay,
                event: GameEvent::ScoreUndone,
            })
        );
    }

    #[test]
    fn undo_after_skip_has_nothing_to_revert() {
        let mut engine = playing();
        engine.dispatch(OperatorCommand::Skip).unwrap();

        assert_eq!(
            engine.dispatch(OperatorCommand::Undo).unwrap_err(),
            Rejection::NothingToUndo
        );
        assert_eq!(engine.phase(), GamePhase::Feedback);
    }

    // Team replacement resets the answer clock.
    #[test]
    fn later_buzz_replaces_active_team_and_resets_clock() {
        let mut engine = playing();
        buzz(&mut engine, "team-0").unwrap();
        tick_active(&mut engine);
        tick_active(&mut engine);
        tick_active(&mut engine);
        assert_eq!(engine.answer_timer(), 2);

        buzz(&mut engine, "team-2").unwrap();
        assert_eq!(engine.active_team(), Some("team-2"));
        assert_eq!(engine.answer_timer(), 5);
        assert_invariants(&engine);
    }

    #[test]
    fn repeated_buzz_keeps_the_answer_clock() {
        let mut engine = playing();
        buzz(&mut engine, "team-1").unwrap();
        tick_active(&mut engine);
        let before = engine.snapshot();

        assert_eq!(
            buzz(&mut engine, "team-1").unwrap_err(),
            Rejection::AlreadyAnswering("team-1".into())
        );
        assert_eq!(engine.answer_timer(), 4);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn buzz_outside_question_phases_or_from_unknown_team_is_ignored() {
        let mut engine = engine_with(QuestionDeck::generate(&Default::default()), &[0]);
        assert_eq!(
            buzz(&mut engine, "team-0").unwrap_err(),
            Rejection::BuzzClosed(GamePhase::Briefing)
        );

        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();
        assert_eq!(
            buzz(&mut engine, "team-7").unwrap_err(),
            Rejection::UnknownTeam("team-7".into())
        );
        assert!(engine.active_team().is_none());
    }

    // 180 seconds without any buzz.
    #[test]
    fn main_clock_expiry_burns_the_question_once() {
        let mut engine = playing();

        let mut expirations = 0;
        for _ in 0..180 {
            if tick_active(&mut engine) == TickOutcome::Expired {
                expirations += 1;
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(engine.phase(), GamePhase::Feedback);
        assert_eq!(engine.main_timer(), 0);
        let outcome = engine.last_outcome().unwrap();
        assert_eq!(outcome.outcome, AnswerOutcome::Timeout);
        assert_eq!(outcome.team_id, None);
        assert!(engine.teams().all(|t| t.total_score == 0));
        assert!(engine.active_timer().is_none());
    }

    #[test]
    fn answer_clock_holds_at_zero_without_changing_phase() {
        let mut engine = playing();
        buzz(&mut engine, "team-0").unwrap();

        for _ in 0..5 {
            tick_active(&mut engine);
        }
        assert_eq!(engine.answer_timer(), 0);
        assert_eq!(engine.phase(), GamePhase::TeamAnswering);
        assert!(engine.active_timer().is_none());

        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Timeout))
            .unwrap();
        assert_eq!(engine.team("team-0").map(|t| t.total_score), Some(-5));
        assert_eq!(
            engine.last_outcome().map(|o| o.outcome),
            Some(AnswerOutcome::Timeout)
        );
    }

    #[test]
    fn main_clock_pauses_while_a_team_answers() {
        let mut engine = playing();
        tick_active(&mut engine);
        let main_ticket = engine.active_timer().unwrap();
        buzz(&mut engine, "team-0").unwrap();

        assert_eq!(engine.tick(main_ticket), TickOutcome::Stale);
        assert_eq!(engine.main_timer(), 179);
    }

    #[test]
    fn stale_ticket_changes_nothing() {
        let mut engine = playing();
        let old = engine.active_timer().unwrap();
        engine.dispatch(OperatorCommand::Skip).unwrap();
        engine.dispatch(OperatorCommand::NextQuestion).unwrap();

        // Same phase as the old ticket, newer version.
        assert_eq!(engine.phase(), old.phase);
        assert_eq!(engine.tick(old), TickOutcome::Stale);
        assert_eq!(engine.main_timer(), 180);
    }

    #[test]
    fn second_verdict_in_feedback_is_rejected() {
        let mut engine = playing();
        buzz(&mut engine, "team-0").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();

        assert!(matches!(
            engine.dispatch(OperatorCommand::Verdict(Verdict::Correct)),
            Err(Rejection::InvalidTransition(_))
        ));
        assert_eq!(engine.team("team-0").map(|t| t.total_score), Some(5));
    }

    #[test]
    fn verdict_without_buzz_is_rejected() {
        let mut engine = playing();
        assert!(engine
            .dispatch(OperatorCommand::Verdict(Verdict::Wrong))
            .is_err());
        assert_eq!(engine.phase(), GamePhase::QuestionDisplay);
    }

    // Verdict and advance on the last question.
    #[test]
    fn advancing_past_last_question_finishes_the_game() {
        let mut engine = engine_with(QuestionDeck::new(vec![question(1, 10)], Vec::new()), &[0]);
        engine.dispatch(OperatorCommand::CompleteBriefing).unwrap();
        engine.dispatch(OperatorCommand::StartRound).unwrap();
        buzz(&mut engine, "team-0").unwrap();
        engine
            .dispatch(OperatorCommand::Verdict(Verdict::Correct))
            .unwrap();

        let applied = engine.dispatch(OperatorCommand::NextQuestion).unwrap();
        assert_eq!(applied.phase, GamePhase::GameFinished);
        assert!(!engine.can_undo());
        assert_eq!(engine.leaderboard()[0].total_score, 10);

        engine.dispatch(OperatorCommand::DismissFinish).unwrap();
        assert_eq!(engine.phase(), GamePhase::RoundOver);
    }

    #[test]
    fn abort_stops_clocks_and_clears_active_team_from_any_phase() {
        let mut engine = playing();
        buzz(&mut engine, "team-1").unwrap();
        let ticket = engine.active_timer().unwrap();

        engine.dispatch(OperatorCommand::AbortRound).unwrap();
        assert_eq!(engine.phase(), GamePhase::RoundOver);
        assert!(engine.active_team().is_none());
        assert!(engine.active_timer().is_none());
        assert_eq!(engine.tick(ticket), TickOutcome::Stale);

        // Setup and briefing can be aborted too.
        let mut fresh = GameEngine::new(&AppConfig::default());
        fresh.dispatch(OperatorCommand::AbortRound).unwrap();
        assert_eq!(fresh.phase(), GamePhase::RoundOver);
    }

    #[test]
    fn new_setup_after_round_over_opens_a_fresh_session() {
        let mut engine = playing();
        let first_session = engine.session_id();
        engine.dispatch(OperatorCommand::AbortRound).unwrap();

        engine
            .dispatch(OperatorCommand::SubmitSetup(SessionSetup {
                teams: seeds(&[3, 4]),
                deck: QuestionDeck::generate(&Default::default()),
            }))
            .unwrap();

        assert_eq!(engine.phase(), GamePhase::Briefing);
        assert_ne!(engine.session_id(), first_session);
        assert_eq!(engine.teams().count(), 2);
        assert_eq!(engine.briefing_slide(), 0);
    }
}
