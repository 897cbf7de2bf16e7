use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{
        common::GameStateSnapshot,
        public::{GamePhaseResponse, LeaderboardResponse},
    },
    services::public_service,
    state::SharedState,
};

/// Public read-only endpoints that expose the current game state.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/state", get(get_state))
        .route("/public/leaderboard", get(get_leaderboard))
        .route("/public/phase", get(get_game_phase))
}

#[utoipa::path(
    get,
    path = "/public/state",
    tag = "public",
    responses((status = 200, description = "Current game snapshot", body = GameStateSnapshot))
)]
/// Return everything the display renders: phase, question, timers, active team, scores.
pub async fn get_state(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(public_service::get_state(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/leaderboard",
    tag = "public",
    responses((status = 200, description = "Ranked teams", body = LeaderboardResponse))
)]
/// Return teams ranked by total score with their qualification flag.
pub async fn get_leaderboard(State(state): State<SharedState>) -> Json<LeaderboardResponse> {
    Json(public_service::get_leaderboard(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/phase",
    tag = "public",
    responses((status = 200, description = "Current game phase", body = GamePhaseResponse))
)]
/// Return the current game phase.
pub async fn get_game_phase(State(state): State<SharedState>) -> Json<GamePhaseResponse> {
    Json(public_service::get_game_phase(&state).await)
}
