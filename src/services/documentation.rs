use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Brain Blast Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::public::get_state,
        crate::routes::public::get_leaderboard,
        crate::routes::public::get_game_phase,
        crate::routes::admin::submit_setup,
        crate::routes::admin::next_slide,
        crate::routes::admin::previous_slide,
        crate::routes::admin::complete_briefing,
        crate::routes::admin::start_round,
        crate::routes::admin::buzz,
        crate::routes::admin::verdict,
        crate::routes::admin::skip,
        crate::routes::admin::undo,
        crate::routes::admin::next_question,
        crate::routes::admin::abort_round,
        crate::routes::admin::dismiss_finish,
        crate::routes::admin::press_key,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisibleGamePhase,
            crate::dto::game::SetupRequest,
            crate::dto::game::TeamInput,
            crate::dto::game::ScoreInput,
            crate::dto::game::QuestionInput,
            crate::dto::game::TeamSummary,
            crate::dto::game::QuestionSummary,
            crate::dto::game::DifficultyDto,
            crate::dto::common::GameStateSnapshot,
            crate::dto::common::LastOutcomeSnapshot,
            crate::dto::common::OutcomeTag,
            crate::dto::admin::BuzzRequest,
            crate::dto::admin::VerdictRequest,
            crate::dto::admin::VerdictInput,
            crate::dto::admin::KeyPressRequest,
            crate::dto::admin::CommandResponse,
            crate::dto::public::LeaderboardEntry,
            crate::dto::public::LeaderboardResponse,
            crate::dto::public::GamePhaseResponse,
            crate::dto::sse::AdminHandshake,
            crate::dto::sse::TimerEvent,
            crate::dto::sse::ScoreChangedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "public", description = "Read-only display endpoints"),
        (name = "admin", description = "Operator commands driving the round"),
    )
)]
pub struct ApiDoc;
