//! Service helpers that expose read-only public projections of the current game.

use crate::{
    dto::{
        common::GameStateSnapshot,
        public::{GamePhaseResponse, LeaderboardEntry, LeaderboardResponse},
    },
    state::SharedState,
};

/// Full display snapshot.
pub async fn get_state(state: &SharedState) -> GameStateSnapshot {
    state.read_engine(GameStateSnapshot::from_engine).await
}

/// Teams ranked by total score; the first `qualifier_count` places qualify.
pub async fn get_leaderboard(state: &SharedState) -> LeaderboardResponse {
    let qualifiers = state.config().qualifier_count();
    let entries: Vec<LeaderboardEntry> = state
        .read_engine(|engine| {
            engine
                .leaderboard()
                .into_iter()
                .enumerate()
                .map(|(position, team)| LeaderboardEntry {
                    rank: position + 1,
                    team_id: team.id.clone(),
                    name: team.name.clone(),
                    round_score: team.round_score,
                    total_score: team.total_score,
                    qualified: position < qualifiers,
                })
                .collect()
        })
        .await;

    LeaderboardResponse {
        winner: entries.first().cloned(),
        entries,
    }
}

/// Current phase and state machine version.
pub async fn get_game_phase(state: &SharedState) -> GamePhaseResponse {
    state
        .read_engine(|engine| {
            let snapshot = engine.snapshot();
            GamePhaseResponse {
                phase: snapshot.phase.into(),
                version: snapshot.version,
            }
        })
        .await
}
