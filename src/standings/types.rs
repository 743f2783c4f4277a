use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tournament::models::TournamentStatus;

/// One scored row of a standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub player_id: Uuid,
    pub display_name: String,
    pub plus_clusters: u32,
    pub plus_remainder: u32,
    pub minus_clusters: u32,
    pub minus_remainder: u32,
    pub net_score: i32,
}

/// Response body for GET /tournaments/:tournament_id/standings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentStandingsResponse {
    pub tournament_id: Uuid,
    pub slug: String,
    pub name: String,
    pub status: TournamentStatus,
    pub game_count: i32,
    pub computed_at: DateTime<Utc>,
    pub standings: Vec<StandingsRow>,
}

/// Response body for GET /standings/:year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearStandingsResponse {
    pub year: i32,
    pub game_count: i32,
    pub computed_at: DateTime<Utc>,
    pub standings: Vec<StandingsRow>,
}
