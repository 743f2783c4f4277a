use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle of a tournament
///
/// Tournaments start as drafts while the roster is assembled, move to active
/// once games are being recorded, and end closed. Transitions only move
/// forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Draft,
    Active,
    Closed,
}

impl TournamentStatus {
    /// Check whether moving to `next` is a legal forward transition
    pub fn can_transition_to(self, next: TournamentStatus) -> bool {
        matches!(
            (self, next),
            (TournamentStatus::Draft, TournamentStatus::Active)
                | (TournamentStatus::Active, TournamentStatus::Closed)
        )
    }
}

/// Database model for the tournaments table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentModel {
    pub id: Uuid,
    /// Random pet name for scoreboards and URLs shared between scorekeepers
    pub slug: String,
    pub name: String,
    pub status: TournamentStatus,
    /// IDs of players registered for this tournament, in join order
    pub player_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TournamentModel {
    /// Creates a new draft tournament with a generated ID and slug
    pub fn new(name: String) -> Self {
        let slug = petname::Petnames::default().generate_one(2, "-");

        Self {
            id: Uuid::new_v4(),
            slug,
            name,
            status: TournamentStatus::Draft,
            player_ids: vec![],
            created_at: Utc::now(),
        }
    }

    /// Get the current number of registered players
    pub fn get_player_count(&self) -> i32 {
        self.player_ids.len() as i32
    }

    /// Check if a player is registered for this tournament
    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.player_ids.contains(&player_id)
    }

    /// Players may join while the tournament is a draft or already running
    pub fn registration_open(&self) -> bool {
        matches!(
            self.status,
            TournamentStatus::Draft | TournamentStatus::Active
        )
    }

    /// Once a tournament leaves the draft stage nobody may be removed,
    /// otherwise recorded games could reference players outside the roster
    pub fn roster_locked(&self) -> bool {
        self.status != TournamentStatus::Draft
    }

    /// Add a player to the roster
    pub fn add_player(&mut self, player_id: Uuid) {
        if !self.has_player(player_id) {
            self.player_ids.push(player_id);
        }
    }

    /// Remove a player from the roster
    pub fn remove_player(&mut self, player_id: Uuid) {
        self.player_ids.retain(|p| *p != player_id);
    }
}
