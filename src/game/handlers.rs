use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::GameService,
    types::{GameCreateRequest, GameListQuery, GameResponse},
};
use crate::shared::{AppError, AppState};

fn game_service(state: &AppState) -> GameService {
    GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.tournament_repository),
        Arc::clone(&state.player_repository),
        state.config.game_delete_grace_minutes,
    )
}

/// HTTP handler for recording a finished game
///
/// POST /games
/// Accepts the ordered score events of the game and stores them verbatim.
#[instrument(name = "record_game", skip(state, request))]
pub async fn record_game(
    State(state): State<AppState>,
    Json(request): Json<GameCreateRequest>,
) -> Result<Json<GameResponse>, AppError> {
    info!(
        event_count = request.events.len(),
        tournament_id = ?request.tournament_id,
        "Recording game"
    );

    let service = game_service(&state);
    let game = service.record_game(request).await?;

    info!(game_id = %game.id, "Game recorded successfully");

    Ok(Json(game))
}

/// HTTP handler for listing games
///
/// GET /games?tournament_id=...&year=...
/// The two filters are mutually exclusive.
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    info!(
        tournament_id = ?query.tournament_id,
        year = ?query.year,
        "Listing games"
    );

    let service = game_service(&state);
    let games = service.list_games(query).await?;

    info!(game_count = games.len(), "Games listed successfully");

    Ok(Json(games))
}

/// HTTP handler for fetching a single game
///
/// GET /games/:game_id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    info!(game_id = %game_id, "Fetching game");

    let service = game_service(&state);
    let game = service.get_game(game_id).await?;

    Ok(Json(game))
}

/// HTTP handler for deleting a recently recorded game
///
/// DELETE /games/:game_id
/// Only allowed within the configured grace period after recording.
#[instrument(name = "delete_game", skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!(game_id = %game_id, "Deleting game");

    let service = game_service(&state);
    service.delete_game(game_id).await?;

    info!(game_id = %game_id, "Game deleted successfully");

    Ok(StatusCode::NO_CONTENT)
}
