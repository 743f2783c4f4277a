use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::events::{MarkKind, ScoreEvent};

/// Number of same-kind marks that complete a cluster worth one net point.
pub const CLUSTER_SIZE: u32 = 4;

/// Unresolved marks carried over from a prior scoring window. Both sides are
/// in `[0, 3]` when produced by this module; they seed the counts of the next
/// window so that windowed scoring matches one-shot scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remainder {
    pub plus: u32,
    pub minus: u32,
}

impl Remainder {
    pub fn new(plus: u32, minus: u32) -> Self {
        Self { plus, minus }
    }
}

/// Score summary for one player within one aggregation scope.
///
/// Invariant: `count = CLUSTER_SIZE * clusters + remainder` per side, where
/// `count` is the seeded mark total folded by [`score_player`]. Remainders
/// never contribute to `net_score`; only completed clusters net against each
/// other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub plus_clusters: u32,
    pub minus_clusters: u32,
    pub plus_remainder: u32,
    pub minus_remainder: u32,
    pub net_score: i32,
}

impl PlayerScore {
    /// Builds the summary straight from per-side mark totals.
    pub fn from_counts(plus_count: u32, minus_count: u32) -> Self {
        let plus_clusters = plus_count / CLUSTER_SIZE;
        let minus_clusters = minus_count / CLUSTER_SIZE;

        Self {
            plus_clusters,
            minus_clusters,
            plus_remainder: plus_count % CLUSTER_SIZE,
            minus_remainder: minus_count % CLUSTER_SIZE,
            net_score: plus_clusters as i32 - minus_clusters as i32,
        }
    }

    /// The unresolved marks of this window, ready to seed the next one.
    pub fn remainder(&self) -> Remainder {
        Remainder::new(self.plus_remainder, self.minus_remainder)
    }
}

/// Scores a single player's events, optionally seeded with the remainder of
/// a previous window.
///
/// The events must already be filtered to the player being scored (see
/// [`score_tournament`] for the multi-player entry point). Event order is
/// immaterial: the fold only counts marks per kind. Zero events yield the
/// pass-through of the seed, or an all-zero score without one.
pub fn score_player(events: &[ScoreEvent], initial: Option<Remainder>) -> PlayerScore {
    let seed = initial.unwrap_or_default();
    let mut plus_count = seed.plus;
    let mut minus_count = seed.minus;

    for event in events {
        match event.kind {
            MarkKind::Plus => plus_count += 1,
            MarkKind::Minus => minus_count += 1,
        }
    }

    PlayerScore::from_counts(plus_count, minus_count)
}

/// Scores a full aggregation scope: one entry per id in `player_ids`, zero
/// rows included.
///
/// Ids listed without matching events score all-zero (or the pass-through of
/// their seed); events of players absent from `player_ids` are silently
/// excluded. The iteration order of the returned map carries no meaning;
/// presentation layers sort it themselves.
pub fn score_tournament(
    events: &[ScoreEvent],
    player_ids: &[String],
    initials: Option<&HashMap<String, Remainder>>,
) -> HashMap<String, PlayerScore> {
    let grouped = group_by_player(events);

    player_ids
        .iter()
        .map(|player_id| {
            let player_events = grouped
                .get(player_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let initial = initials.and_then(|seeds| seeds.get(player_id)).copied();

            (player_id.clone(), score_player(player_events, initial))
        })
        .collect()
}

/// Partitions a mixed event stream by player, preserving each player's
/// relative event order from the input.
pub fn group_by_player(events: &[ScoreEvent]) -> HashMap<String, Vec<ScoreEvent>> {
    let mut grouped: HashMap<String, Vec<ScoreEvent>> = HashMap::new();

    for event in events {
        grouped
            .entry(event.player_id.clone())
            .or_default()
            .push(event.clone());
    }

    grouped
}
