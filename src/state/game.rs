//! Domain records shared by the roster, the question deck and the game engine.

/// Difficulty band of a question, derived from its point value on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// Regular question.
    Easy,
    /// High-value question.
    Hard,
}

impl Difficulty {
    /// Point value from which an imported question is classified as hard.
    pub const HARD_THRESHOLD: u32 = 10;

    /// Classify a question by its point value.
    pub fn from_points(points: u32) -> Self {
        if points >= Self::HARD_THRESHOLD {
            Difficulty::Hard
        } else {
            Difficulty::Easy
        }
    }
}

/// A single question shown on screen. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question number as known by the operator.
    pub id: u32,
    /// Difficulty band.
    pub difficulty: Difficulty,
    /// Points won on a correct answer and lost on a wrong one.
    pub points: u32,
    /// Image displayed while the question is open.
    pub image_url: String,
}

impl Question {
    /// Signed score delta this question yields for the given verdict.
    pub fn delta_for(&self, verdict: Verdict) -> i32 {
        let points = i32::try_from(self.points).unwrap_or(i32::MAX);
        if verdict.is_correct() { points } else { -points }
    }
}

/// A competing team and its scores for the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Stable identifier for the whole session (`team-{position}`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Score carried over from the previous round.
    pub initial_score: i32,
    /// Sum of the deltas earned during this round.
    pub round_score: i32,
    /// Always `initial_score + round_score` between two operations.
    pub total_score: i32,
}

impl Team {
    /// Build a team at the start of a round.
    pub fn new(id: String, name: String, initial_score: i32) -> Self {
        Self {
            id,
            name,
            initial_score,
            round_score: 0,
            total_score: initial_score,
        }
    }

    /// Scores saturate at the `i32` bounds instead of wrapping.
    pub(crate) fn apply_delta(&mut self, delta: i32) {
        self.round_score = self.round_score.saturating_add(delta);
        self.total_score = self.initial_score.saturating_add(self.round_score);
    }

    pub(crate) fn restore(&mut self, round_score: i32, total_score: i32) {
        self.round_score = round_score;
        self.total_score = total_score;
    }
}

/// Operator judgement on the answer given by the active team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The answer was right.
    Correct,
    /// The answer was wrong.
    Wrong,
    /// The team ran out of answering time.
    Timeout,
}

impl Verdict {
    /// Whether the verdict awards points.
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }

    /// Outcome tag displayed once the verdict is recorded.
    pub fn outcome(self) -> AnswerOutcome {
        match self {
            Verdict::Correct => AnswerOutcome::Correct,
            Verdict::Wrong => AnswerOutcome::Wrong,
            Verdict::Timeout => AnswerOutcome::Timeout,
        }
    }
}

/// Tag describing how the last question closed. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// A team answered correctly.
    Correct,
    /// A team answered wrongly.
    Wrong,
    /// Nobody answered in time, or the question was skipped.
    Timeout,
}

/// How the last question closed, kept for the feedback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastOutcome {
    /// Outcome tag.
    pub outcome: AnswerOutcome,
    /// Team the verdict concerned, absent when the question burned unanswered.
    pub team_id: Option<String>,
    /// Score delta that was applied (zero when unanswered).
    pub delta: i32,
}

/// Pre-mutation scores of the team touched by the most recent verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChangeRecord {
    /// Team whose score changed.
    pub team_id: String,
    /// Round score before the change.
    pub prev_round_score: i32,
    /// Total score before the change.
    pub prev_total_score: i32,
    /// Delta that was applied.
    pub delta: i32,
}
