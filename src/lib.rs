// Library crate for the tallyboard scorekeeping server
// This file exposes the public API for integration tests

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod game;
pub mod player;
pub mod scoring;
pub mod session;
pub mod shared;
pub mod standings;
pub mod tournament;

// Re-export commonly used types for easier access in tests
pub use scoring::{
    group_by_player, score_player, score_tournament, MarkKind, PlayerScore, Remainder, ScoreEvent,
};
pub use shared::{AppError, AppState};

/// Builds the full application router
///
/// Everything except /health and /login sits behind the session middleware
/// and requires a Bearer token obtained from /login.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/players",
            post(player::create_player).get(player::list_players),
        )
        .route(
            "/players/:player_id",
            get(player::get_player)
                .put(player::update_player)
                .delete(player::delete_player),
        )
        .route(
            "/tournaments",
            post(tournament::create_tournament).get(tournament::list_tournaments),
        )
        .route(
            "/tournaments/:tournament_id",
            get(tournament::get_tournament),
        )
        .route(
            "/tournaments/:tournament_id/status",
            post(tournament::update_tournament_status),
        )
        .route(
            "/tournaments/:tournament_id/roster",
            post(tournament::join_tournament_roster),
        )
        .route(
            "/tournaments/:tournament_id/roster/:player_id",
            delete(tournament::leave_tournament_roster),
        )
        .route(
            "/tournaments/:tournament_id/standings",
            get(standings::tournament_standings),
        )
        .route("/games", post(game::record_game).get(game::list_games))
        .route(
            "/games/:game_id",
            get(game::get_game).delete(game::delete_game),
        )
        .route("/standings/:year", get(standings::year_standings))
        .route("/logout", post(session::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/login", post(session::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
