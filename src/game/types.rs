use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::ScoreEventModel;

/// Request payload for recording a played game
#[derive(Debug, Deserialize)]
pub struct GameCreateRequest {
    /// Tournament the game belongs to; omit for casual games
    pub tournament_id: Option<Uuid>,
    /// When the game was played; defaults to the time of recording
    pub played_at: Option<DateTime<Utc>>,
    pub events: Vec<ScoreEventModel>,
}

/// Query parameters for listing games
#[derive(Debug, Default, Deserialize)]
pub struct GameListQuery {
    pub tournament_id: Option<Uuid>,
    pub year: Option<i32>,
}

/// Response for game recording and game information
#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub played_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_count: i32,
    pub events: Vec<ScoreEventModel>,
}
