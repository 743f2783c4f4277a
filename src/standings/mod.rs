// Public API - what other modules can use
pub use handlers::{tournament_standings, year_standings};

// Internal modules
mod handlers;
mod service;
mod types;
