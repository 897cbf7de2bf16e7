/// Admin service translating operator actions into engine commands.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Session setup building from the setup form.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Public service for read-only game information.
pub mod public_service;
/// Admin console keyboard bindings.
pub mod shortcuts;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
