use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the players table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerModel {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    /// Set when the player is removed from the registry; scores are kept
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PlayerModel {
    /// Creates a new player model with a generated ID
    pub fn new(display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Check if the player has been removed from the registry
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Mark the player as removed, keeping the first deletion timestamp
    pub fn mark_deleted(&mut self) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(Utc::now());
        }
    }
}
