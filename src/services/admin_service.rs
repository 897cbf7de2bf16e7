//! Business logic powering the admin REST routes. Every route ends up as one
//! [`OperatorCommand`] run against the shared engine; commands the current phase does not
//! allow are acknowledged as ignored instead of failing.

use tracing::{debug, info};

use crate::{
    dto::{
        admin::{CommandResponse, VerdictInput},
        common::GameStateSnapshot,
        game::SetupRequest,
    },
    services::{game_service, shortcuts, sse_events},
    state::{SharedState, engine::OperatorCommand},
};

/// Open a new session from the setup form.
pub async fn submit_setup(state: &SharedState, request: SetupRequest) -> CommandResponse {
    let setup = game_service::build_session_setup(state.config(), request);
    run_command(state, OperatorCommand::SubmitSetup(setup)).await
}

/// Show the next briefing slide, leaving the briefing after the last one.
pub async fn next_slide(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::NextSlide).await
}

/// Show the previous briefing slide.
pub async fn previous_slide(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::PreviousSlide).await
}

/// Leave the briefing right away.
pub async fn complete_briefing(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::CompleteBriefing).await
}

/// Open the first question.
pub async fn start_round(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::StartRound).await
}

/// Register a buzz from `team_id`.
pub async fn buzz(state: &SharedState, team_id: String) -> CommandResponse {
    run_command(state, OperatorCommand::Buzz { team_id }).await
}

/// Judge the answer of the team currently answering.
pub async fn verdict(state: &SharedState, verdict: VerdictInput) -> CommandResponse {
    run_command(state, OperatorCommand::Verdict(verdict.into())).await
}

/// Burn the open question without scoring.
pub async fn skip(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::Skip).await
}

/// Revert the last verdict and reopen the question.
pub async fn undo(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::Undo).await
}

/// Move past the feedback screen.
pub async fn next_question(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::NextQuestion).await
}

/// End the round from whatever phase the game is in.
pub async fn abort_round(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::AbortRound).await
}

/// Close the finished-game summary.
pub async fn dismiss_finish(state: &SharedState) -> CommandResponse {
    run_command(state, OperatorCommand::DismissFinish).await
}

/// Translate a console key press; unbound keys are acknowledged as ignored.
pub async fn press_key(state: &SharedState, key: &str) -> CommandResponse {
    match shortcuts::command_for_key(key) {
        Some(command) => run_command(state, command).await,
        None => {
            debug!(key, "ignoring unbound key");
            CommandResponse {
                applied: false,
                reason: Some(format!("no command bound to key `{key}`")),
                state: state.read_engine(GameStateSnapshot::from_engine).await,
            }
        }
    }
}

async fn run_command(state: &SharedState, command: OperatorCommand) -> CommandResponse {
    let name = command.name();
    let (result, snapshot) = state
        .dispatch_with(command, |engine, result| {
            if let Ok(applied) = result {
                if let Some(team_id) = applied.scored_team.as_deref() {
                    sse_events::broadcast_score_changed(state, engine, team_id);
                }
                sse_events::broadcast_phase_changed(state, engine);
            }
            GameStateSnapshot::from_engine(engine)
        })
        .await;

    match result {
        Ok(applied) => {
            info!(
                command = name,
                from = ?applied.from,
                to = ?applied.phase,
                version = applied.version,
                transitioned = applied.transitioned(),
                "admin command applied"
            );
            CommandResponse {
                applied: true,
                reason: None,
                state: snapshot,
            }
        }
        Err(rejection) => {
            debug!(command = name, reason = %rejection, "admin command ignored");
            CommandResponse {
                applied: false,
                reason: Some(rejection.to_string()),
                state: snapshot,
            }
        }
    }
}
