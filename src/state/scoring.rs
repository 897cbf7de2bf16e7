//! Team roster and the scoring engine: the only place team scores change, with a single-step
//! undo record.

use indexmap::IndexMap;

use crate::state::game::{ScoreChangeRecord, Team};

/// Operator input for one roster slot before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSeed {
    /// Display name.
    pub name: String,
    /// Score carried from the previous round.
    pub initial_score: i32,
}

/// Teams of the session in roster order, keyed by their identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    teams: IndexMap<String, Team>,
    last_change: Option<ScoreChangeRecord>,
}

impl Roster {
    /// Build a roster from seeds, assigning `team-{position}` identifiers.
    pub fn from_seeds(seeds: Vec<TeamSeed>) -> Self {
        let teams = seeds
            .into_iter()
            .enumerate()
            .map(|(position, seed)| {
                let id = format!("team-{position}");
                (id.clone(), Team::new(id, seed.name, seed.initial_score))
            })
            .collect();

        Self {
            teams,
            last_change: None,
        }
    }

    /// Whether `team_id` is on the roster.
    pub fn contains(&self, team_id: &str) -> bool {
        self.teams.contains_key(team_id)
    }

    /// Look a team up by identifier.
    pub fn get(&self, team_id: &str) -> Option<&Team> {
        self.teams.get(team_id)
    }

    /// Teams in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// The change that would be reverted by [`Roster::undo_last`], if any.
    pub fn last_change(&self) -> Option<&ScoreChangeRecord> {
        self.last_change.as_ref()
    }

    /// Apply `delta` to one team, retaining its previous scores as the only undoable step.
    ///
    /// Returns `None` (and changes nothing) when the team is unknown.
    pub fn apply_delta(&mut self, team_id: &str, delta: i32) -> Option<&Team> {
        let team = self.teams.get_mut(team_id)?;
        self.last_change = Some(ScoreChangeRecord {
            team_id: team.id.clone(),
            prev_round_score: team.round_score,
            prev_total_score: team.total_score,
            delta,
        });
        team.apply_delta(delta);
        Some(team)
    }

    /// Revert the retained change, returning the record that was undone.
    pub fn undo_last(&mut self) -> Option<ScoreChangeRecord> {
        let record = self.last_change.take()?;
        match self.teams.get_mut(&record.team_id) {
            Some(team) => team.restore(record.prev_round_score, record.prev_total_score),
            // Roster is only ever replaced wholesale, which also drops the record.
            None => return None,
        }
        Some(record)
    }

    /// Forget the retained change; the next question makes it non-undoable.
    pub fn clear_last_change(&mut self) {
        self.last_change = None;
    }

    /// Teams ranked by total score, highest first; ties keep roster order.
    pub fn leaderboard(&self) -> Vec<&Team> {
        let mut ranked: Vec<&Team> = self.teams.values().collect();
        ranked.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        ranked
    }
}
