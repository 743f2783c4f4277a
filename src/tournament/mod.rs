// Public API - what other modules can use
pub use handlers::{
    create_tournament, get_tournament, join_tournament_roster, leave_tournament_roster,
    list_tournaments, update_tournament_status,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
