use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::{
        admin::{BuzzRequest, CommandResponse, KeyPressRequest, VerdictRequest},
        game::SetupRequest,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin-only endpoints driving the round.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/setup", post(submit_setup))
        .route("/admin/briefing/next", post(next_slide))
        .route("/admin/briefing/previous", post(previous_slide))
        .route("/admin/briefing/complete", post(complete_briefing))
        .route("/admin/round/start", post(start_round))
        .route("/admin/round/abort", post(abort_round))
        .route("/admin/buzz", post(buzz))
        .route("/admin/verdict", post(verdict))
        .route("/admin/question/skip", post(skip))
        .route("/admin/question/undo", post(undo))
        .route("/admin/question/next", post(next_question))
        .route("/admin/finish/dismiss", post(dismiss_finish))
        .route("/admin/key", post(press_key))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Submit the roster and optional uploaded questions, opening the briefing.
#[utoipa::path(
    post,
    path = "/admin/setup",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = SetupRequest,
    responses(
        (status = 200, description = "Setup processed", body = CommandResponse),
        (status = 400, description = "Invalid setup payload")
    )
)]
pub async fn submit_setup(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SetupRequest>>,
) -> Json<CommandResponse> {
    Json(admin_service::submit_setup(&state, payload).await)
}

/// Advance the briefing slideshow.
#[utoipa::path(
    post,
    path = "/admin/briefing/next",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn next_slide(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::next_slide(&state).await)
}

/// Go back one briefing slide.
#[utoipa::path(
    post,
    path = "/admin/briefing/previous",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn previous_slide(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::previous_slide(&state).await)
}

/// Skip the rest of the briefing.
#[utoipa::path(
    post,
    path = "/admin/briefing/complete",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn complete_briefing(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::complete_briefing(&state).await)
}

/// Start the round on the first question.
#[utoipa::path(
    post,
    path = "/admin/round/start",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn start_round(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::start_round(&state).await)
}

/// End the round immediately, whatever the phase.
#[utoipa::path(
    post,
    path = "/admin/round/abort",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn abort_round(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::abort_round(&state).await)
}

/// Register a team's buzz.
#[utoipa::path(
    post,
    path = "/admin/buzz",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = BuzzRequest,
    responses(
        (status = 200, description = "Command processed", body = CommandResponse),
        (status = 400, description = "Invalid buzz payload")
    )
)]
pub async fn buzz(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<BuzzRequest>>,
) -> Json<CommandResponse> {
    Json(admin_service::buzz(&state, payload.team_id).await)
}

/// Judge the answering team.
#[utoipa::path(
    post,
    path = "/admin/verdict",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = VerdictRequest,
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn verdict(
    State(state): State<SharedState>,
    Json(payload): Json<VerdictRequest>,
) -> Json<CommandResponse> {
    Json(admin_service::verdict(&state, payload.verdict).await)
}

/// Burn the open question.
#[utoipa::path(
    post,
    path = "/admin/question/skip",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn skip(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::skip(&state).await)
}

/// Revert the last verdict.
#[utoipa::path(
    post,
    path = "/admin/question/undo",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn undo(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::undo(&state).await)
}

/// Move on from the feedback screen.
#[utoipa::path(
    post,
    path = "/admin/question/next",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn next_question(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::next_question(&state).await)
}

/// Close the finished-game summary.
#[utoipa::path(
    post,
    path = "/admin/finish/dismiss",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Command processed", body = CommandResponse))
)]
pub async fn dismiss_finish(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(admin_service::dismiss_finish(&state).await)
}

/// Forward a console key press.
#[utoipa::path(
    post,
    path = "/admin/key",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = KeyPressRequest,
    responses(
        (status = 200, description = "Key processed", body = CommandResponse),
        (status = 400, description = "Invalid key payload")
    )
)]
pub async fn press_key(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<KeyPressRequest>>,
) -> Json<CommandResponse> {
    Json(admin_service::press_key(&state, &payload.key).await)
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    match state.admin_channel().check_token(&provided).await {
        Some(true) => Ok(next.run(req).await),
        Some(false) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized(
            "admin SSE stream not initialised yet".into(),
        )),
    }
}
