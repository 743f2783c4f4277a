// Public API - what other modules can use
pub use cleanup_task::{start_cleanup_task, SessionCleanupConfig};
pub use handlers::{login, logout};
pub use middleware::require_session;
pub use types::SessionClaims;

// Internal modules
mod cleanup_task;
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
mod service;
mod token;
mod types;
