use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::PlayerService,
    types::{PlayerCreateRequest, PlayerListQuery, PlayerResponse, PlayerUpdateRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new player
///
/// POST /players
/// Returns player information with generated ID
#[instrument(name = "create_player", skip(state))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerCreateRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    info!(display_name = %request.display_name, "Registering new player");

    let service = PlayerService::new(Arc::clone(&state.player_repository));
    let player = service.create_player(request).await?;

    info!(
        player_id = %player.id,
        display_name = %player.display_name,
        "Player registered successfully"
    );

    Ok(Json(player))
}

/// HTTP handler for listing players
///
/// GET /players?include_deleted=true
/// Returns array of players, hiding removed players unless requested
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayerListQuery>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let include_deleted = query.include_deleted.unwrap_or(false);
    info!(include_deleted, "Listing players");

    let service = PlayerService::new(Arc::clone(&state.player_repository));
    let players = service.list_players(include_deleted).await?;

    info!(player_count = players.len(), "Players listed successfully");

    Ok(Json(players))
}

/// HTTP handler for fetching a single player
///
/// GET /players/:player_id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, AppError> {
    info!(player_id = %player_id, "Fetching player");

    let service = PlayerService::new(Arc::clone(&state.player_repository));
    let player = service.get_player(player_id).await?;

    Ok(Json(player))
}

/// HTTP handler for renaming a player
///
/// PUT /players/:player_id
#[instrument(name = "update_player", skip(state))]
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
    Json(request): Json<PlayerUpdateRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    info!(player_id = %player_id, display_name = %request.display_name, "Renaming player");

    let service = PlayerService::new(Arc::clone(&state.player_repository));
    let player = service.update_player(player_id, request).await?;

    info!(player_id = %player.id, "Player renamed successfully");

    Ok(Json(player))
}

/// HTTP handler for removing a player from the registry
///
/// DELETE /players/:player_id
/// Recorded scores are kept; the player disappears from default listings
#[instrument(name = "delete_player", skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!(player_id = %player_id, "Removing player from registry");

    let service = PlayerService::new(Arc::clone(&state.player_repository));
    service.delete_player(player_id).await?;

    info!(player_id = %player_id, "Player removed successfully");

    Ok(StatusCode::NO_CONTENT)
}
