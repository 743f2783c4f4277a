use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{MarkKind, ScoreEvent};

/// A single tally mark recorded against a player during a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEventModel {
    pub player_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MarkKind,
}

/// Database model for the games table
///
/// Events are stored with the game in recording order. A game without a
/// tournament is a casual game that only counts toward yearly standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameModel {
    pub id: Uuid,
    pub tournament_id: Option<Uuid>,
    /// When the game was played, as reported by the scorekeeper
    pub played_at: DateTime<Utc>,
    /// When the game was recorded; the deletion grace window starts here
    pub created_at: DateTime<Utc>,
    pub events: Vec<ScoreEventModel>,
}

impl GameModel {
    /// Creates a new game model with a generated ID
    pub fn new(
        tournament_id: Option<Uuid>,
        played_at: DateTime<Utc>,
        events: Vec<ScoreEventModel>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            played_at,
            created_at: Utc::now(),
            events,
        }
    }

    /// Converts stored events into scoring engine events
    pub fn score_events(&self) -> Vec<ScoreEvent> {
        self.events
            .iter()
            .map(|e| ScoreEvent::new(e.player_id.to_string(), e.kind))
            .collect()
    }

    /// IDs of all players with at least one event in this game, in first
    /// appearance order
    pub fn player_ids(&self) -> Vec<Uuid> {
        let mut seen = Vec::new();
        for event in &self.events {
            if !seen.contains(&event.player_id) {
                seen.push(event.player_id);
            }
        }
        seen
    }

    /// Check if the game can still be deleted at `now`
    pub fn within_delete_grace(&self, now: DateTime<Utc>, grace_minutes: i64) -> bool {
        now - self.created_at <= Duration::minutes(grace_minutes)
    }
}
