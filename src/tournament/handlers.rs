use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::TournamentService,
    types::{
        RosterJoinRequest, TournamentCreateRequest, TournamentResponse, TournamentStatusRequest,
    },
};
use crate::shared::{AppError, AppState};

fn tournament_service(state: &AppState) -> TournamentService {
    TournamentService::new(
        Arc::clone(&state.tournament_repository),
        Arc::clone(&state.player_repository),
    )
}

/// HTTP handler for creating a new tournament
///
/// POST /tournaments
/// Returns tournament information with generated ID and slug
#[instrument(name = "create_tournament", skip(state))]
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<TournamentCreateRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    info!(name = %request.name, "Creating new tournament");

    let service = tournament_service(&state);
    let tournament = service.create_tournament(request).await?;

    info!(
        tournament_id = %tournament.id,
        slug = %tournament.slug,
        "Tournament created successfully"
    );

    Ok(Json(tournament))
}

/// HTTP handler for listing all tournaments
///
/// GET /tournaments
#[instrument(name = "list_tournaments", skip(state))]
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<TournamentResponse>>, AppError> {
    info!("Listing all tournaments");

    let service = tournament_service(&state);
    let tournaments = service.list_tournaments().await?;

    info!(
        tournament_count = tournaments.len(),
        "Tournaments listed successfully"
    );

    Ok(Json(tournaments))
}

/// HTTP handler for fetching a single tournament
///
/// GET /tournaments/:tournament_id
#[instrument(name = "get_tournament", skip(state))]
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<TournamentResponse>, AppError> {
    info!(tournament_id = %tournament_id, "Fetching tournament");

    let service = tournament_service(&state);
    let tournament = service.get_tournament(tournament_id).await?;

    Ok(Json(tournament))
}

/// HTTP handler for moving a tournament through its lifecycle
///
/// POST /tournaments/:tournament_id/status
#[instrument(name = "update_tournament_status", skip(state))]
pub async fn update_tournament_status(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
    Json(request): Json<TournamentStatusRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    info!(tournament_id = %tournament_id, status = %request.status, "Updating tournament status");

    let service = tournament_service(&state);
    let tournament = service.update_status(tournament_id, request).await?;

    info!(
        tournament_id = %tournament.id,
        status = %tournament.status,
        "Tournament status updated successfully"
    );

    Ok(Json(tournament))
}

/// HTTP handler for registering a player in a tournament roster
///
/// POST /tournaments/:tournament_id/roster
#[instrument(name = "join_tournament_roster", skip(state))]
pub async fn join_tournament_roster(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
    Json(request): Json<RosterJoinRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    info!(tournament_id = %tournament_id, player_id = %request.player_id, "Joining tournament roster");

    let service = tournament_service(&state);
    let tournament = service.join_roster(tournament_id, request.player_id).await?;

    info!(
        tournament_id = %tournament.id,
        player_count = tournament.player_count,
        "Roster updated successfully"
    );

    Ok(Json(tournament))
}

/// HTTP handler for removing a player from a draft tournament roster
///
/// DELETE /tournaments/:tournament_id/roster/:player_id
#[instrument(name = "leave_tournament_roster", skip(state))]
pub async fn leave_tournament_roster(
    State(state): State<AppState>,
    Path((tournament_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TournamentResponse>, AppError> {
    info!(tournament_id = %tournament_id, player_id = %player_id, "Leaving tournament roster");

    let service = tournament_service(&state);
    let tournament = service.leave_roster(tournament_id, player_id).await?;

    info!(
        tournament_id = %tournament.id,
        player_count = tournament.player_count,
        "Roster updated successfully"
    );

    Ok(Json(tournament))
}
