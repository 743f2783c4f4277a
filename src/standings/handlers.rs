use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::StandingsService,
    types::{TournamentStandingsResponse, YearStandingsResponse},
};
use crate::shared::{AppError, AppState};

fn standings_service(state: &AppState) -> StandingsService {
    StandingsService::new(
        Arc::clone(&state.tournament_repository),
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    )
}

/// HTTP handler for tournament standings
///
/// GET /tournaments/:tournament_id/standings
/// Recomputed from the tournament's full game history on every request.
#[instrument(name = "tournament_standings", skip(state))]
pub async fn tournament_standings(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<TournamentStandingsResponse>, AppError> {
    info!(tournament_id = %tournament_id, "Computing tournament standings");

    let service = standings_service(&state);
    let standings = service.tournament_standings(tournament_id).await?;

    info!(
        tournament_id = %tournament_id,
        row_count = standings.standings.len(),
        "Tournament standings computed successfully"
    );

    Ok(Json(standings))
}

/// HTTP handler for yearly standings
///
/// GET /standings/:year
/// Aggregates every game played in the given calendar year.
#[instrument(name = "year_standings", skip(state))]
pub async fn year_standings(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearStandingsResponse>, AppError> {
    info!(year, "Computing yearly standings");

    let service = standings_service(&state);
    let standings = service.year_standings(year).await?;

    info!(
        year,
        row_count = standings.standings.len(),
        "Yearly standings computed successfully"
    );

    Ok(Json(standings))
}
