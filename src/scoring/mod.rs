// Public API
pub use engine::{
    group_by_player, score_player, score_tournament, PlayerScore, Remainder, CLUSTER_SIZE,
};
pub use events::{MarkKind, ScoreEvent};

// Internal modules
mod engine;
mod events;
