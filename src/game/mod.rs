// Public API - what other modules can use
pub use handlers::{delete_game, get_game, list_games, record_game};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
