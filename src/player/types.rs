use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request payload for registering a new player
#[derive(Debug, Deserialize)]
pub struct PlayerCreateRequest {
    pub display_name: String,
}

/// Request payload for renaming a player
#[derive(Debug, Deserialize)]
pub struct PlayerUpdateRequest {
    pub display_name: String,
}

/// Query parameters for listing players
#[derive(Debug, Default, Deserialize)]
pub struct PlayerListQuery {
    /// Include players that were removed from the registry
    pub include_deleted: Option<bool>,
}

/// Response for player creation and player information
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}
