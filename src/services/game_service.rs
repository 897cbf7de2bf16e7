//! Turns the setup form into the roster and question deck handed to the engine.

use tracing::{debug, info};

use crate::{
    config::AppConfig,
    dto::game::{QuestionInput, ScoreInput, SetupRequest, TeamInput},
    state::{
        engine::SessionSetup,
        questions::{QuestionDeck, QuestionImport},
        scoring::TeamSeed,
    },
};

/// Build the session from a validated setup request.
///
/// Never fails: blank names, unparseable scores, an empty roster or an empty upload all fall
/// back to defaults.
pub fn build_session_setup(config: &AppConfig, request: SetupRequest) -> SessionSetup {
    let SetupRequest {
        teams,
        questions,
        backup_questions,
        shuffle,
    } = request;

    let teams = build_teams(config, teams);
    let mut deck = QuestionDeck::from_imports(
        into_imports(questions),
        into_imports(backup_questions),
        config.deck(),
    );
    if shuffle {
        deck.shuffle();
        debug!(questions = deck.len(), "question order shuffled");
    }

    info!(
        teams = teams.len(),
        questions = deck.len(),
        backups = deck.backups_remaining(),
        shuffle,
        "session setup prepared"
    );
    SessionSetup { teams, deck }
}

fn build_teams(config: &AppConfig, teams: Vec<TeamInput>) -> Vec<TeamSeed> {
    if teams.is_empty() {
        return (0..config.default_team_count())
            .map(|position| TeamSeed {
                name: default_team_name(position),
                initial_score: 0,
            })
            .collect();
    }

    teams
        .into_iter()
        .enumerate()
        .map(|(position, team)| {
            let name = team.name.trim();
            TeamSeed {
                name: if name.is_empty() {
                    default_team_name(position)
                } else {
                    name.to_string()
                },
                initial_score: team.score.as_ref().map_or(0, ScoreInput::value),
            }
        })
        .collect()
}

fn default_team_name(position: usize) -> String {
    format!("Team {}", position + 1)
}

fn into_imports(questions: Option<Vec<QuestionInput>>) -> Vec<QuestionImport> {
    questions
        .unwrap_or_default()
        .into_iter()
        .map(QuestionImport::from)
        .collect()
}
