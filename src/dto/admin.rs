//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{common::GameStateSnapshot, validation::validate_not_blank},
    state::game::Verdict,
};

/// Request to register a buzz for a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BuzzRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub team_id: String,
}

/// Judgement of the active team's answer.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictInput {
    Correct,
    Wrong,
    Timeout,
}

impl From<VerdictInput> for Verdict {
    fn from(value: VerdictInput) -> Self {
        match value {
            VerdictInput::Correct => Verdict::Correct,
            VerdictInput::Wrong => Verdict::Wrong,
            VerdictInput::Timeout => Verdict::Timeout,
        }
    }
}

/// Request to record a verdict.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerdictRequest {
    pub verdict: VerdictInput,
}

/// A key pressed on the admin console, using `KeyboardEvent.key` names.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct KeyPressRequest {
    #[validate(length(min = 1, max = 32))]
    pub key: String,
}

/// Acknowledgement returned by every admin command.
///
/// Commands the current phase does not allow are ignored rather than failed: `applied` is
/// false and `reason` says why.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommandResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub state: GameStateSnapshot,
}
