use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::phase::VisibleGamePhase;

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position; ties keep roster order.
    pub rank: usize,
    pub team_id: String,
    pub name: String,
    pub round_score: i32,
    pub total_score: i32,
    /// Whether the position qualifies for the grand final.
    pub qualified: bool,
}

/// Ranked teams for the podium and final screens.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<LeaderboardEntry>,
    pub entries: Vec<LeaderboardEntry>,
}

/// Response exposing the game's phase as seen by the public.
#[derive(Debug, Serialize, ToSchema)]
pub struct GamePhaseResponse {
    pub phase: VisibleGamePhase,
    pub version: u64,
}
