use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    models::TournamentModel,
    repository::{RosterJoinResult, RosterLeaveResult, TournamentRepository},
    types::{TournamentCreateRequest, TournamentResponse, TournamentStatusRequest},
};
use crate::player::repository::PlayerRepository;
use crate::shared::AppError;

/// Service for handling tournament business logic
pub struct TournamentService {
    repository: Arc<dyn TournamentRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
}

fn to_response(tournament: TournamentModel) -> TournamentResponse {
    TournamentResponse {
        id: tournament.id,
        slug: tournament.slug,
        name: tournament.name,
        status: tournament.status,
        player_count: tournament.player_ids.len() as i32,
        player_ids: tournament.player_ids,
        created_at: tournament.created_at,
    }
}

impl TournamentService {
    pub fn new(
        repository: Arc<dyn TournamentRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            player_repository,
        }
    }

    /// Creates a new draft tournament with a generated slug
    #[instrument(skip(self))]
    pub async fn create_tournament(
        &self,
        request: TournamentCreateRequest,
    ) -> Result<TournamentResponse, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Tournament name must not be empty".to_string(),
            ));
        }

        let tournament_model = TournamentModel::new(request.name.trim().to_string());
        debug!(
            tournament_id = %tournament_model.id,
            slug = %tournament_model.slug,
            "Generated tournament ID and slug"
        );

        self.repository.create_tournament(&tournament_model).await?;

        info!(
            tournament_id = %tournament_model.id,
            name = %tournament_model.name,
            "Tournament created successfully"
        );

        Ok(to_response(tournament_model))
    }

    /// Gets tournament details as a response object for API endpoints
    #[instrument(skip(self))]
    pub async fn get_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<TournamentResponse, AppError> {
        let tournament = self
            .repository
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        Ok(to_response(tournament))
    }

    /// Lists all tournaments, newest first
    #[instrument(skip(self))]
    pub async fn list_tournaments(&self) -> Result<Vec<TournamentResponse>, AppError> {
        debug!("Listing all tournaments");

        let mut tournaments = self.repository.list_tournaments().await?;
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        info!(
            tournament_count = tournaments.len(),
            "Tournaments retrieved successfully"
        );

        Ok(tournaments.into_iter().map(to_response).collect())
    }

    /// Moves a tournament through its lifecycle
    ///
    /// Only forward transitions are allowed: DRAFT to ACTIVE, ACTIVE to CLOSED.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        tournament_id: Uuid,
        request: TournamentStatusRequest,
    ) -> Result<TournamentResponse, AppError> {
        let mut tournament = self
            .repository
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        if !tournament.status.can_transition_to(request.status) {
            return Err(AppError::Conflict(format!(
                "Cannot move tournament from {} to {}",
                tournament.status, request.status
            )));
        }

        tournament.status = request.status;
        self.repository.update_tournament(&tournament).await?;

        info!(
            tournament_id = %tournament.id,
            status = %tournament.status,
            "Tournament status updated successfully"
        );

        Ok(to_response(tournament))
    }

    /// Registers a player in the tournament roster
    #[instrument(skip(self))]
    pub async fn join_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<TournamentResponse, AppError> {
        info!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to join roster");

        let player = self
            .player_repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        if player.is_deleted() {
            return Err(AppError::Conflict(
                "Player has been removed from the registry".to_string(),
            ));
        }

        let result = self
            .repository
            .try_join_roster(tournament_id, player_id)
            .await?;

        match result {
            RosterJoinResult::Success(updated_tournament) => {
                info!(
                    tournament_id = %tournament_id,
                    player_id = %player_id,
                    new_player_count = updated_tournament.get_player_count(),
                    "Player joined roster successfully"
                );
                Ok(to_response(updated_tournament))
            }
            RosterJoinResult::AlreadyJoined => Err(AppError::Conflict(
                "Player is already in the roster".to_string(),
            )),
            RosterJoinResult::RegistrationClosed(status) => Err(AppError::Conflict(format!(
                "Tournament is {} and no longer accepts registrations",
                status
            ))),
            RosterJoinResult::TournamentNotFound => {
                Err(AppError::NotFound("Tournament not found".to_string()))
            }
        }
    }

    /// Removes a player from a draft tournament roster
    #[instrument(skip(self))]
    pub async fn leave_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<TournamentResponse, AppError> {
        debug!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to leave roster");

        let result = self
            .repository
            .try_leave_roster(tournament_id, player_id)
            .await?;

        match result {
            RosterLeaveResult::Success(updated_tournament) => {
                info!(
                    tournament_id = %tournament_id,
                    player_id = %player_id,
                    new_player_count = updated_tournament.get_player_count(),
                    "Player left roster successfully"
                );
                Ok(to_response(updated_tournament))
            }
            RosterLeaveResult::PlayerNotInRoster => Err(AppError::NotFound(
                "Player is not in the roster".to_string(),
            )),
            RosterLeaveResult::RosterLocked(status) => Err(AppError::Conflict(format!(
                "Roster is locked once a tournament is {}",
                status
            ))),
            RosterLeaveResult::TournamentNotFound => {
                Err(AppError::NotFound("Tournament not found".to_string()))
            }
        }
    }
}
