use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::TournamentStatus;

/// Request payload for creating a new tournament
#[derive(Debug, Deserialize)]
pub struct TournamentCreateRequest {
    pub name: String,
}

/// Request payload for moving a tournament through its lifecycle
#[derive(Debug, Deserialize)]
pub struct TournamentStatusRequest {
    pub status: TournamentStatus,
}

/// Request payload for registering a player in a tournament roster
#[derive(Debug, Deserialize)]
pub struct RosterJoinRequest {
    pub player_id: Uuid,
}

/// Response for tournament creation and tournament information
#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub status: TournamentStatus,
    pub player_count: i32,
    pub player_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}
