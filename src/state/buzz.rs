//! Buzz-in arbitration: decides what a team's buzz does given the phase and the team
//! currently answering. Last valid signal wins; there is no waiting queue.

use crate::state::state_machine::GamePhase;

/// Result of arbitrating an accepted buzz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuzzDecision {
    /// Nobody was answering; the team takes the turn.
    Claimed,
    /// Another team was answering and is replaced.
    Replaced {
        /// Team that lost its turn.
        previous: String,
    },
    /// The team already holds the turn; its clock must not be refreshed.
    Repeated,
}

impl BuzzDecision {
    /// Whether the decision grants a fresh answering turn.
    pub fn grants_turn(&self) -> bool {
        !matches!(self, BuzzDecision::Repeated)
    }
}

/// Arbitrate a buzz from `team_id`. Returns `None` when buzzers are closed in `phase`.
pub fn arbitrate(phase: GamePhase, active: Option<&str>, team_id: &str) -> Option<BuzzDecision> {
    if !matches!(
        phase,
        GamePhase::QuestionDisplay | GamePhase::TeamAnswering
    ) {
        return None;
    }

    let decision = match active {
        None => BuzzDecision::Claimed,
        Some(current) if current == team_id => BuzzDecision::Repeated,
        Some(current) => BuzzDecision::Replaced {
            previous: current.to_string(),
        },
    };
    Some(decision)
}
