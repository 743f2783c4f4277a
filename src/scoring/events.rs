use std::fmt;
use strum_macros::EnumIter;

use serde::{Deserialize, Serialize};

/// The two tally symbols a game can award. The persisted form is the
/// single-character mark written on a paper scoreboard: "I" for a plus
/// stroke, "X" for a minus stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum MarkKind {
    #[serde(rename = "I")]
    Plus,
    #[serde(rename = "X")]
    Minus,
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MarkKind::Plus => "I",
                MarkKind::Minus => "X",
            }
        )
    }
}

impl TryFrom<&str> for MarkKind {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "I" => Ok(MarkKind::Plus),
            "X" => Ok(MarkKind::Minus),
            _ => Err(s.to_string()),
        }
    }
}

/// A single scoring fact: one mark awarded to one player. Events are never
/// mutated once recorded; standings are recomputed from the full event list
/// of an aggregation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub player_id: String,
    #[serde(rename = "type")]
    pub kind: MarkKind,
}

impl ScoreEvent {
    pub fn new(player_id: impl Into<String>, kind: MarkKind) -> Self {
        Self {
            player_id: player_id.into(),
            kind,
        }
    }
}
